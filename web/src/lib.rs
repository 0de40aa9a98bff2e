//! REST API for the micro frontend workspace.
//!
//! A small CRUD service over embedded SQLite, consumed by the remotes through
//! `mfe-client`:
//!
//! ```text
//! GET    /              banner {"status":"ok","message":"Micro Frontend API"}
//! GET    /health        readiness (pings the database)
//! GET    /todos         list todos
//! POST   /todos         create a todo
//! PATCH  /todos/:id     update a todo
//! DELETE /todos/:id     delete a todo
//! GET    /messages      list messages
//! POST   /messages      create a message
//! DELETE /messages      delete every message
//! ```
//!
//! # Request Flow
//!
//! 1. **Correlation id** assigned (or taken from `X-Correlation-ID`)
//! 2. **CORS** admits the host and remote origins
//! 3. **Extract** path and JSON body; rejections become 400 `{"error"}`
//! 4. **Validate** the body (blank text is rejected)
//! 5. **Repository** call through the storage traits in [`AppState`]
//! 6. **Map result** to JSON, or [`AppError`] to `{"error"}` with a status
//!
//! # Example
//!
//! ```ignore
//! use mfe_web::{AppState, build_router, config::Config};
//!
//! let config = Config::from_env()?;
//! let state = AppState::from_repository(Arc::new(repository));
//! let app = build_router(state, &config.cors_origins);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use error::{AppError, ErrorBody};
pub use extractors::{AppJson, AppPath, CorrelationId};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use router::{api_routes, build_router};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

/// Default `RUST_LOG` filter for the binaries.
pub const DEFAULT_LOG_FILTER: &str = "mfe_web=info,mfe_sqlite=info,tower_http=debug";
