//! Application state for Axum handlers.

use mfe_core::repository::{HealthProbe, MessageRepository, TodoRepository};
use std::sync::Arc;

/// Storage handles shared across all HTTP handlers.
///
/// Handlers only see the repository traits, so tests swap the SQLite
/// repository for `mfe_testing::InMemoryRepository`.
#[derive(Clone)]
pub struct AppState {
    /// Todo storage
    pub todos: Arc<dyn TodoRepository>,
    /// Message storage
    pub messages: Arc<dyn MessageRepository>,
    /// Readiness probe
    pub health: Arc<dyn HealthProbe>,
}

impl AppState {
    /// State backed by a single repository implementing every storage trait.
    #[must_use]
    pub fn from_repository<R>(repository: Arc<R>) -> Self
    where
        R: TodoRepository + MessageRepository + HealthProbe + 'static,
    {
        Self {
            todos: repository.clone(),
            messages: repository.clone(),
            health: repository,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
