use crate::config;
use crate::server;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = config::config().clone();
    if let Some(port) = port {
        config.api.port = port;
    }

    tracing::info!("Starting material catalog API in {:?} mode", config.environment);
    server::serve(&config).await
}
