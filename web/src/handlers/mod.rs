//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by resource.

pub mod health;
pub mod messages;
pub mod todos;

// Re-export handlers for the router
pub use health::{readiness_check, root};
pub use messages::{clear_messages, create_message, list_messages};
pub use todos::{create_todo, delete_todo, list_todos, update_todo};
