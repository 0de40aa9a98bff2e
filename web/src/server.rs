//! Process setup for the binaries: storage, serving, shutdown.

use crate::config::Config;
use crate::metrics;
use crate::router::build_router;
use crate::state::AppState;
use mfe_sqlite::SqliteRepository;
use std::sync::Arc;
use tokio::signal;

/// Open the configured database and apply migrations.
///
/// # Errors
///
/// Fails if the database cannot be opened or a migration fails.
pub async fn open_repository(config: &Config) -> anyhow::Result<SqliteRepository> {
    let repository =
        SqliteRepository::connect(&config.database_url, config.max_connections).await?;
    repository.migrate().await?;
    Ok(repository)
}

/// Run the API until Ctrl+C / SIGTERM.
///
/// # Errors
///
/// Fails if storage cannot be prepared, the metrics exporter cannot be
/// installed, or the listener cannot bind.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    if let Some(addr) = config.metrics_addr() {
        metrics::install_exporter(addr)?;
    }

    let repository = open_repository(&config).await?;
    let state = AppState::from_repository(Arc::new(repository.clone()));
    let app = build_router(state, &config.cors_origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Micro Frontend API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
