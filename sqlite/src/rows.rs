//! Raw rows as stored, and their conversion into domain types.

use chrono::{DateTime, Utc};
use mfe_core::repository::RepositoryError;
use mfe_core::types::{Message, Origin, Todo};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TodoRow {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            completed: row.completed,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MessageRow {
    pub id: i64,
    pub text: String,
    pub from: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let from: Origin = row.from.parse().map_err(|_| {
            RepositoryError::CorruptRow(format!(
                "message {} has unknown origin {:?}",
                row.id, row.from
            ))
        })?;
        Ok(Self {
            id: row.id,
            text: row.text,
            from,
            created_at: row.created_at,
        })
    }
}
