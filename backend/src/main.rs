#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pantry::start_server().await
}
