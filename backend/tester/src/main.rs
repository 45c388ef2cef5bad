use anyhow::{Result, bail};
use clap::Parser;
use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,
}

struct Tester {
    client: Client,
    base_url: String,
}

impl Tester {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        expected: StatusCode,
    ) -> Result<Value> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        println!("{method} {path} -> {status}");
        println!("{payload:#}");

        if status != expected {
            bail!("{method} {path}: expected {expected}, got {status}");
        }

        Ok(payload)
    }
}

fn id_of(record: &Value) -> Result<String> {
    match record.get("_id").and_then(Value::as_str) {
        Some(id) => Ok(id.to_string()),
        None => bail!("response has no _id: {record}"),
    }
}

async fn items(tester: &Tester) -> Result<()> {
    let item = tester
        .call(
            Method::POST,
            "/items/",
            Some(json!({
                "name": "Tester",
                "email": "tester@example.com",
                "item_name": "flour",
                "quantity": 3,
                "expiry_date": "2030-01-01",
            })),
            StatusCode::OK,
        )
        .await?;
    let id = id_of(&item)?;

    tester
        .call(Method::GET, &format!("/items/{id}"), None, StatusCode::OK)
        .await?;
    tester
        .call(
            Method::GET,
            "/items/filter?email=tester@example.com&quantity=3",
            None,
            StatusCode::OK,
        )
        .await?;
    tester
        .call(
            Method::PUT,
            &format!("/items/{id}"),
            Some(json!({ "quantity": 4 })),
            StatusCode::OK,
        )
        .await?;
    tester
        .call(Method::GET, "/items/aggregate", None, StatusCode::OK)
        .await?;
    tester
        .call(Method::DELETE, &format!("/items/{id}"), None, StatusCode::OK)
        .await?;
    tester
        .call(
            Method::DELETE,
            &format!("/items/{id}"),
            None,
            StatusCode::NOT_FOUND,
        )
        .await?;

    Ok(())
}

async fn clock_in(tester: &Tester) -> Result<()> {
    let record = tester
        .call(
            Method::POST,
            "/clock-in/",
            Some(json!({ "email": "tester@example.com", "location": "front desk" })),
            StatusCode::OK,
        )
        .await?;
    let id = id_of(&record)?;

    tester
        .call(
            Method::GET,
            "/clock-in/filter?location=front%20desk",
            None,
            StatusCode::OK,
        )
        .await?;
    tester
        .call(
            Method::PUT,
            &format!("/clock-in/{id}"),
            Some(json!({ "location": "back door" })),
            StatusCode::OK,
        )
        .await?;
    tester
        .call(
            Method::DELETE,
            &format!("/clock-in/{id}"),
            None,
            StatusCode::OK,
        )
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let tester = Tester {
        client: Client::new(),
        base_url: args.base_url,
    };

    items(&tester).await?;
    clock_in(&tester).await?;

    println!("All checks passed");

    Ok(())
}
