//! Todo endpoints.
//!
//! ```text
//! GET    /todos        list, oldest first
//! POST   /todos        create from {"text"}
//! PATCH  /todos/:id    partial update of text / completed
//! DELETE /todos/:id    remove
//! ```

use crate::error::AppError;
use crate::extractors::{AppJson, AppPath, CorrelationId};
use crate::metrics;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use mfe_core::types::{NewTodo, SuccessResponse, Todo, TodoPatch};

/// `GET /todos`
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.todos.list_todos().await?))
}

/// `POST /todos`
///
/// Returns 201 with the stored todo (`completed = false`), or 400 when the
/// body is malformed or the text is blank.
#[tracing::instrument(skip_all, fields(correlation_id = %correlation_id))]
pub async fn create_todo(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    AppJson(body): AppJson<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = state.todos.create_todo(body.validate()?).await?;
    metrics::todo_created();
    tracing::info!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `PATCH /todos/:id`
///
/// Absent fields are left unchanged; an empty patch returns the current row.
/// Unknown ids yield 404 `{"error": "Not found"}`.
pub async fn update_todo(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(patch): AppJson<TodoPatch>,
) -> Result<Json<Todo>, AppError> {
    let todo = state.todos.update_todo(id, patch.validate()?).await?;
    tracing::debug!(id, completed = todo.completed, "todo updated");
    Ok(Json(todo))
}

/// `DELETE /todos/:id`
pub async fn delete_todo(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.todos.delete_todo(id).await?;
    metrics::todo_deleted();
    tracing::info!(id, "todo deleted");
    Ok(Json(SuccessResponse::OK))
}
