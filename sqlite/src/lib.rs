//! Embedded `SQLite` storage for the micro frontend API.
//!
//! [`SqliteRepository`] implements the storage traits from `mfe-core` over a
//! single `SQLite` file (or an in-memory database for tests):
//!
//! - Connection pooling through `sqlx`
//! - Embedded migrations (`migrations/`), applied with [`SqliteRepository::migrate`]
//! - Server-assigned ids and creation timestamps
//!
//! # Example
//!
//! ```no_run
//! use mfe_core::repository::TodoRepository;
//! use mfe_core::types::NewTodo;
//! use mfe_sqlite::SqliteRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = SqliteRepository::connect("sqlite://./data/local.db", 5).await?;
//! repo.migrate().await?;
//!
//! let todo = repo.create_todo(NewTodo::new("buy milk")).await?;
//! assert!(!todo.completed);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod rows;

use mfe_core::environment::{Clock, SystemClock};
use mfe_core::repository::{
    HealthProbe, MessageRepository, RepositoryError, RepositoryFuture, TodoRepository,
};
use mfe_core::types::{Message, NewMessage, NewTodo, Todo, TodoPatch};
use rows::{MessageRow, TodoRow};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

fn db_error(context: &str, e: &sqlx::Error) -> RepositoryError {
    RepositoryError::Database(format!("{context}: {e}"))
}

/// `SQLite`-backed repository for todos and messages.
///
/// Cloning shares the pool.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteRepository {
    /// Wrap an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Wrap an existing pool, stamping rows with `clock`.
    #[must_use]
    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Open (creating if needed) the database at `database_url`.
    ///
    /// The parent directory of a file database is created first.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the URL is invalid, the
    /// directory cannot be created, or the connection fails.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| db_error("Invalid database URL", &e))?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() && parent != Path::new(":memory:") {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    RepositoryError::Database(format!(
                        "Failed to create {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| db_error("Failed to connect", &e))?;

        tracing::info!(database_url, max_connections, "connected to SQLite");
        Ok(Self::new(pool))
    }

    /// Fresh private in-memory database. Used by tests.
    ///
    /// The pool holds exactly one connection that never expires, so the
    /// database lives as long as the repository.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if `SQLite` cannot be opened.
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| db_error("Invalid database URL", &e))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| db_error("Failed to open in-memory database", &e))?;
        Ok(Self::new(pool))
    }

    /// Replace the clock used for `created_at`.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Apply the embedded migrations. Safe to run repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Migration failed: {e}")))?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl std::fmt::Debug for SqliteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRepository")
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

impl TodoRepository for SqliteRepository {
    fn list_todos(&self) -> RepositoryFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            let rows: Vec<TodoRow> = sqlx::query_as(
                "SELECT id, text, completed, created_at FROM todos ORDER BY created_at, id",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list todos", &e))?;

            Ok(rows.into_iter().map(Todo::from).collect())
        })
    }

    fn create_todo(&self, todo: NewTodo) -> RepositoryFuture<'_, Todo> {
        Box::pin(async move {
            let row: TodoRow = sqlx::query_as(
                r"
                INSERT INTO todos (text, completed, created_at)
                VALUES (?1, 0, ?2)
                RETURNING id, text, completed, created_at
                ",
            )
            .bind(&todo.text)
            .bind(self.clock.now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create todo", &e))?;

            tracing::debug!(id = row.id, "todo created");
            Ok(row.into())
        })
    }

    fn update_todo(&self, id: i64, patch: TodoPatch) -> RepositoryFuture<'_, Todo> {
        Box::pin(async move {
            let row: Option<TodoRow> = sqlx::query_as(
                r"
                UPDATE todos
                SET text = COALESCE(?2, text),
                    completed = COALESCE(?3, completed)
                WHERE id = ?1
                RETURNING id, text, completed, created_at
                ",
            )
            .bind(id)
            .bind(patch.text)
            .bind(patch.completed)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update todo", &e))?;

            row.map(Todo::from).ok_or(RepositoryError::NotFound)
        })
    }

    fn delete_todo(&self, id: i64) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to delete todo", &e))?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }
}

impl MessageRepository for SqliteRepository {
    fn list_messages(&self) -> RepositoryFuture<'_, Vec<Message>> {
        Box::pin(async move {
            let rows: Vec<MessageRow> = sqlx::query_as(
                r#"SELECT id, text, "from", created_at FROM messages ORDER BY created_at, id"#,
            )
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list messages", &e))?;

            rows.into_iter().map(Message::try_from).collect()
        })
    }

    fn create_message(&self, message: NewMessage) -> RepositoryFuture<'_, Message> {
        Box::pin(async move {
            let row: MessageRow = sqlx::query_as(
                r#"
                INSERT INTO messages (text, "from", created_at)
                VALUES (?1, ?2, ?3)
                RETURNING id, text, "from", created_at
                "#,
            )
            .bind(&message.text)
            .bind(message.from.as_str())
            .bind(self.clock.now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create message", &e))?;

            Message::try_from(row)
        })
    }

    fn clear_messages(&self) -> RepositoryFuture<'_, u64> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM messages")
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to clear messages", &e))?;

            tracing::debug!(removed = result.rows_affected(), "messages cleared");
            Ok(result.rows_affected())
        })
    }
}

impl HealthProbe for SqliteRepository {
    fn ping(&self) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Ping failed", &e))?;
            Ok(())
        })
    }
}
