//! Health check endpoints.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use mfe_core::types::HealthResponse;

/// Liveness banner.
///
/// ```text
/// GET /
/// ```
///
/// ```json
/// { "status": "ok", "message": "Micro Frontend API" }
/// ```
#[allow(clippy::unused_async)]
pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Readiness check: succeeds only when the database answers.
///
/// ```text
/// GET /health
/// ```
///
/// Returns 503 `{"error": ...}` when the database is unreachable.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, AppError> {
    state.health.ping().await.map_err(|e| {
        AppError::unavailable("Database unavailable").with_source(e.into())
    })?;
    Ok(Json(HealthResponse::ok()))
}
