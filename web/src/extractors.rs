//! Custom Axum extractors.
//!
//! - [`AppJson`] and [`AppPath`]: `Json` / `Path` whose rejections become
//!   400 [`AppError`]s with the usual `{"error": ...}` body instead of axum's
//!   plain-text responses
//! - [`CorrelationId`]: the request's correlation id
//!
//! # Examples
//!
//! ```ignore
//! async fn update_todo(
//!     State(state): State<AppState>,
//!     AppPath(id): AppPath<i64>,
//!     AppJson(patch): AppJson<TodoPatch>,
//! ) -> WebResult<Json<Todo>> { ... }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

/// JSON body extractor with [`AppError`] rejections.
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameter extractor with [`AppError`] rejections.
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Correlation ID for request tracing.
///
/// Taken from the request extensions when the correlation-id middleware is
/// installed, otherwise from the `X-Correlation-ID` header, otherwise freshly
/// generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }

        let id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(id))
    }
}
