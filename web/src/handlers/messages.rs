//! Message endpoints.
//!
//! ```text
//! GET    /messages    list, oldest first
//! POST   /messages    create from {"text", "from"}
//! DELETE /messages    remove every message
//! ```

use crate::error::AppError;
use crate::extractors::{AppJson, CorrelationId};
use crate::metrics;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use mfe_core::types::{Message, NewMessage, SuccessResponse};

/// `GET /messages`
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Message>>, AppError> {
    Ok(Json(state.messages.list_messages().await?))
}

/// `POST /messages`
///
/// `from` must be one of `host`, `remote1`, `remote2`; anything else is a
/// 400 like any other malformed body.
#[tracing::instrument(skip_all, fields(correlation_id = %correlation_id))]
pub async fn create_message(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    AppJson(body): AppJson<NewMessage>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = state.messages.create_message(body.validate()?).await?;
    metrics::message_created(message.from.as_str());
    tracing::info!(id = message.id, from = %message.from, "message created");
    Ok((StatusCode::CREATED, Json(message)))
}

/// `DELETE /messages`
pub async fn clear_messages(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse>, AppError> {
    let removed = state.messages.clear_messages().await?;
    metrics::messages_cleared(removed);
    tracing::info!(removed, "messages cleared");
    Ok(Json(SuccessResponse::OK))
}
