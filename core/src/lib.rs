//! # Micro Frontend Core
//!
//! Shared types and traits for the micro frontend workspace.
//!
//! Every application in the workspace (the host shell, both remotes, the
//! REST service and its client) depends on this crate for the same wire
//! types and contracts, so a `Todo` serialized by the service is exactly the
//! `Todo` the remotes deserialize.
//!
//! ## Contents
//!
//! - **Types**: [`Todo`](types::Todo), [`Message`](types::Message),
//!   [`Origin`](types::Origin) and the request/response bodies of the REST API
//! - **Repository**: storage traits implemented by the SQLite crate and by the
//!   in-memory mock in the testing crate
//! - **Event bus**: the page-wide custom event contract shared between remotes
//! - **Environment**: injected dependencies such as [`Clock`](environment::Clock)
//!
//! ## Example
//!
//! ```
//! use mfe_core::types::{NewTodo, Origin};
//!
//! let todo = NewTodo::new("buy milk").validate().unwrap();
//! assert_eq!(todo.text, "buy milk");
//! assert_eq!(Origin::Remote1.as_str(), "remote1");
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

pub mod event_bus;
pub mod repository;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod types;

/// Environment module - Dependency injection traits
///
/// All time-dependent code takes its clock through this trait so tests can
/// pin timestamps.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use mfe_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let before = clock.now();
    /// assert!(clock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
