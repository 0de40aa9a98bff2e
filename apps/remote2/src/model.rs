//! Items shown by the todo list.

use mfe_core::types::Todo;
use serde::Serialize;

/// Where a list item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoSource {
    /// Built-in starter item, replaced once the API answers
    Seed,
    /// Row persisted by the API
    Server,
    /// Added while the API was unreachable
    Local,
    /// Added by an `mf:add-todo` event from another remote
    Event,
}

impl TodoSource {
    /// Whether the item only exists in this list and could be pushed to the API.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Local | Self::Event)
    }
}

/// One row of the list.
///
/// Server rows carry their positive database id, seed items negative ids and
/// unsaved items millisecond-derived ids, so an id names one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItem {
    /// Server id, a negative seed id, or a time-derived id for items that
    /// never reached the API
    pub id: i64,
    /// Text as typed
    pub text: String,
    /// Done flag
    pub completed: bool,
    /// Provenance
    pub source: TodoSource,
}

impl TodoItem {
    /// Item that has not been persisted.
    #[must_use]
    pub fn unsaved(id: i64, text: impl Into<String>, source: TodoSource) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            source,
        }
    }
}

impl From<Todo> for TodoItem {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            text: todo.text,
            completed: todo.completed,
            source: TodoSource::Server,
        }
    }
}

/// The list shown before the API has answered.
#[must_use]
pub fn seed_todos() -> Vec<TodoItem> {
    vec![
        TodoItem {
            id: -1,
            text: "Learn Micro Frontends".to_string(),
            completed: false,
            source: TodoSource::Seed,
        },
        TodoItem {
            id: -2,
            text: "Build with Module Federation".to_string(),
            completed: true,
            source: TodoSource::Seed,
        },
    ]
}
