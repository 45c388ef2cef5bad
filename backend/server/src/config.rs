use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use anyhow::{Result, anyhow};
use tracing::{info, warn};

const DEFAULT_CLUSTER: &str = "mongodb-cluster.ovjkv.mongodb.net";
const LOCAL_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "fastapi_crud";

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub mongo_uri: String,
    pub database_name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "8000")?,
            mongo_uri: mongo_uri(),
            database_name: try_load("DB_NAME", DEFAULT_DATABASE)?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow!("Invalid {key} value {raw}: {e}"))
}

/// Environment first, then the mounted secret file.
fn read_secret(secret_name: &str) -> Option<String> {
    if let Some(value) = var(secret_name) {
        return Some(value);
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
}

fn mongo_uri() -> String {
    if let Some(uri) = var("MONGO_URI") {
        return uri;
    }

    match (read_secret("DB_USER"), read_secret("DB_PASSWORD")) {
        (Some(user), Some(password)) => {
            let cluster = var("DB_CLUSTER").unwrap_or_else(|| DEFAULT_CLUSTER.to_string());
            cluster_uri(&user, &password, &cluster)
        }
        _ => {
            warn!("No database credentials found, using {LOCAL_URI}");
            LOCAL_URI.to_string()
        }
    }
}

fn cluster_uri(user: &str, password: &str, cluster: &str) -> String {
    let app_name = cluster.split('.').next().unwrap_or(cluster);

    format!(
        "mongodb+srv://{user}:{password}@{cluster}/?retryWrites=true&w=majority&appName={app_name}"
    )
}
