use material_catalog::{config, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, ADMIN_TOKEN, etc.
    let _ = dotenvy::dotenv();

    server::init_tracing();

    let config = config::config();
    tracing::info!("Starting material catalog API in {:?} mode", config.environment);

    server::serve(config).await
}
