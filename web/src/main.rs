//! Micro Frontend API server.
//!
//! Serves todos and messages to the host and remote applications.

use mfe_web::{Config, DEFAULT_LOG_FILTER, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    mfe_core::telemetry::init_tracing(DEFAULT_LOG_FILTER);

    tracing::info!("Starting Micro Frontend API");

    let config = Config::from_env()?;
    tracing::info!(
        addr = %config.bind_addr(),
        database_url = %config.database_url,
        origins = config.cors_origins.len(),
        "Configuration loaded"
    );

    server::serve(config).await
}
