//! Apply database migrations and exit.
//!
//! Creates the database file (and its directory) if needed.

use mfe_web::{Config, DEFAULT_LOG_FILTER, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    mfe_core::telemetry::init_tracing(DEFAULT_LOG_FILTER);

    let config = Config::from_env()?;
    tracing::info!(database_url = %config.database_url, "Running migrations");

    let repository = server::open_repository(&config).await?;
    repository.close().await;

    tracing::info!("Migrations complete");
    Ok(())
}
