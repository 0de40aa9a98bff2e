//! Business metrics for the API.
//!
//! Counters are always recorded through the `metrics` facade; they are only
//! exported when a Prometheus exporter is installed (see
//! [`install_exporter`]). Without one, recording is a no-op.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install the Prometheus exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Register descriptions for every counter the API records.
pub fn register_metrics() {
    describe_counter!("mfe_todos_created_total", "Todos created");
    describe_counter!("mfe_todos_deleted_total", "Todos deleted");
    describe_counter!("mfe_messages_created_total", "Messages created");
    describe_counter!("mfe_messages_cleared_total", "Messages removed by clear");
}

/// Install a Prometheus exporter serving `/metrics` on `addr`.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a recorder is already installed or the
/// listener cannot be started.
pub fn install_exporter(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::Install(e.to_string()))?;
    register_metrics();
    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Record a created todo.
pub fn todo_created() {
    metrics::counter!("mfe_todos_created_total").increment(1);
}

/// Record a deleted todo.
pub fn todo_deleted() {
    metrics::counter!("mfe_todos_deleted_total").increment(1);
}

/// Record a created message.
pub fn message_created(from: &'static str) {
    metrics::counter!("mfe_messages_created_total", "from" => from).increment(1);
}

/// Record a clear of the message log.
pub fn messages_cleared(removed: u64) {
    metrics::counter!("mfe_messages_cleared_total").increment(removed);
}
