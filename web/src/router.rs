//! Router configuration.

use crate::handlers;
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, patch},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// API routes without any middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::readiness_check))
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todos/:id",
            patch(handlers::update_todo).delete(handlers::delete_todo),
        )
        .route(
            "/messages",
            get(handlers::list_messages)
                .post(handlers::create_message)
                .delete(handlers::clear_messages),
        )
}

/// CORS policy admitting exactly `origins`.
#[must_use]
pub fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the complete router: routes, CORS, request tracing and correlation
/// ids.
pub fn build_router(state: AppState, allowed_origins: &[HeaderValue]) -> Router {
    api_routes()
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}
