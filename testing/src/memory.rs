//! In-memory storage for fast, deterministic tests.
//!
//! [`InMemoryRepository`] implements [`TodoRepository`], [`MessageRepository`]
//! and [`HealthProbe`] over plain vectors. It mirrors the SQLite semantics the
//! handlers rely on: ids start at 1 and are never reused, listings are ordered
//! by creation time, and unknown ids yield [`RepositoryError::NotFound`].

use mfe_core::environment::Clock;
use mfe_core::repository::{
    HealthProbe, MessageRepository, RepositoryError, RepositoryFuture, TodoRepository,
};
use mfe_core::types::{Message, NewMessage, NewTodo, Todo, TodoPatch};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct Tables {
    todos: Vec<Todo>,
    messages: Vec<Message>,
    next_todo_id: i64,
    next_message_id: i64,
}

/// `Vec`-backed repository. Cloning shares the same tables.
#[derive(Clone)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
    clock: Arc<dyn Clock>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryRepository {
    /// Empty repository with a stepping clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(crate::mocks::step_clock()))
    }

    /// Empty repository stamping rows with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables {
                next_todo_id: 1,
                next_message_id: 1,
                ..Tables::default()
            })),
            clock,
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent call fail with [`RepositoryError::Database`]
    /// (or succeed again with `false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored todos.
    #[must_use]
    pub fn todo_count(&self) -> usize {
        self.tables.read().todos.len()
    }

    /// Number of stored messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.tables.read().messages.len()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(
                "in-memory repository marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("tables", &*self.tables.read())
            .finish_non_exhaustive()
    }
}

impl TodoRepository for InMemoryRepository {
    fn list_todos(&self) -> RepositoryFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            self.check()?;
            let mut todos = self.tables.read().todos.clone();
            todos.sort_by_key(|todo| (todo.created_at, todo.id));
            Ok(todos)
        })
    }

    fn create_todo(&self, todo: NewTodo) -> RepositoryFuture<'_, Todo> {
        Box::pin(async move {
            self.check()?;
            let created_at = self.clock.now();
            let mut tables = self.tables.write();
            let row = Todo {
                id: tables.next_todo_id,
                text: todo.text,
                completed: false,
                created_at,
            };
            tables.next_todo_id += 1;
            tables.todos.push(row.clone());
            Ok(row)
        })
    }

    fn update_todo(&self, id: i64, patch: TodoPatch) -> RepositoryFuture<'_, Todo> {
        Box::pin(async move {
            self.check()?;
            let mut tables = self.tables.write();
            let row = tables
                .todos
                .iter_mut()
                .find(|todo| todo.id == id)
                .ok_or(RepositoryError::NotFound)?;
            if let Some(text) = patch.text {
                row.text = text;
            }
            if let Some(completed) = patch.completed {
                row.completed = completed;
            }
            Ok(row.clone())
        })
    }

    fn delete_todo(&self, id: i64) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            self.check()?;
            let mut tables = self.tables.write();
            let before = tables.todos.len();
            tables.todos.retain(|todo| todo.id != id);
            if tables.todos.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }
}

impl MessageRepository for InMemoryRepository {
    fn list_messages(&self) -> RepositoryFuture<'_, Vec<Message>> {
        Box::pin(async move {
            self.check()?;
            let mut messages = self.tables.read().messages.clone();
            messages.sort_by_key(|message| (message.created_at, message.id));
            Ok(messages)
        })
    }

    fn create_message(&self, message: NewMessage) -> RepositoryFuture<'_, Message> {
        Box::pin(async move {
            self.check()?;
            let created_at = self.clock.now();
            let mut tables = self.tables.write();
            let row = Message {
                id: tables.next_message_id,
                text: message.text,
                from: message.from,
                created_at,
            };
            tables.next_message_id += 1;
            tables.messages.push(row.clone());
            Ok(row)
        })
    }

    fn clear_messages(&self) -> RepositoryFuture<'_, u64> {
        Box::pin(async move {
            self.check()?;
            let mut tables = self.tables.write();
            let removed = u64::try_from(tables.messages.len()).unwrap_or(u64::MAX);
            tables.messages.clear();
            Ok(removed)
        })
    }
}

impl HealthProbe for InMemoryRepository {
    fn ping(&self) -> RepositoryFuture<'_, ()> {
        Box::pin(async move { self.check() })
    }
}
