//! Storage traits for the CRUD service.
//!
//! The REST handlers only talk to these traits. Two implementations exist:
//!
//! - **`SqliteRepository`** (production, `mfe-sqlite`): durable storage in an
//!   embedded SQLite file
//! - **`InMemoryRepository`** (testing, `mfe-testing`): `Vec`-backed, for fast
//!   handler tests
//!
//! # Dyn Compatibility
//!
//! Methods return explicit `Pin<Box<dyn Future>>` instead of using `async fn`
//! so the web layer can hold `Arc<dyn TodoRepository>` in its state.
//!
//! # Example
//!
//! ```rust,ignore
//! use mfe_core::repository::{TodoRepository, RepositoryError};
//! use mfe_core::types::{NewTodo, TodoPatch};
//!
//! async fn example(repo: &dyn TodoRepository) -> Result<(), RepositoryError> {
//!     let todo = repo.create_todo(NewTodo::new("buy milk")).await?;
//!     repo.update_todo(todo.id, TodoPatch::completed(true)).await?;
//!     repo.delete_todo(todo.id).await?;
//!     Ok(())
//! }
//! ```

use crate::types::{Message, NewMessage, NewTodo, Todo, TodoPatch};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors returned by repository implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No row matched the requested id.
    #[error("Not found")]
    NotFound,

    /// The underlying database failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A stored row could not be decoded into a domain type.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

/// Boxed future returned by repository methods.
pub type RepositoryFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Persistence for [`Todo`] rows.
pub trait TodoRepository: Send + Sync {
    /// All todos ordered by creation time ascending (ties broken by id).
    fn list_todos(&self) -> RepositoryFuture<'_, Vec<Todo>>;

    /// Insert a todo with `completed = false` and a server-assigned id and
    /// timestamp.
    fn create_todo(&self, todo: NewTodo) -> RepositoryFuture<'_, Todo>;

    /// Apply a partial update and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if `id` does not exist.
    fn update_todo(&self, id: i64, patch: TodoPatch) -> RepositoryFuture<'_, Todo>;

    /// Remove a todo.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if `id` does not exist.
    fn delete_todo(&self, id: i64) -> RepositoryFuture<'_, ()>;
}

/// Persistence for [`Message`] rows.
pub trait MessageRepository: Send + Sync {
    /// All messages ordered by creation time ascending (ties broken by id).
    fn list_messages(&self) -> RepositoryFuture<'_, Vec<Message>>;

    /// Append a message with a server-assigned id and timestamp.
    fn create_message(&self, message: NewMessage) -> RepositoryFuture<'_, Message>;

    /// Delete every message, returning how many rows were removed.
    fn clear_messages(&self) -> RepositoryFuture<'_, u64>;
}

/// Connectivity probe used by the readiness endpoint.
pub trait HealthProbe: Send + Sync {
    /// Succeeds when the backing store answers a trivial query.
    fn ping(&self) -> RepositoryFuture<'_, ()>;
}
