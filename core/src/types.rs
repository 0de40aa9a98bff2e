//! Wire and domain types shared by the service, the client and the remotes.
//!
//! JSON field names follow the browser convention (`createdAt`), and
//! [`Origin`] serializes as the lowercase application name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which application produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The host shell
    Host,
    /// The counter remote
    Remote1,
    /// The todo-list remote
    Remote2,
}

impl Origin {
    /// All origins in display order.
    pub const ALL: [Self; 3] = [Self::Host, Self::Remote1, Self::Remote2];

    /// Wire and database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Remote1 => "remote1",
            Self::Remote2 => "remote2",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" => Ok(Self::Host),
            "remote1" => Ok(Self::Remote1),
            "remote2" => Ok(Self::Remote2),
            other => Err(ValidationError::UnknownOrigin(other.to_string())),
        }
    }
}

/// Validation failures for request bodies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was missing or blank
    #[error("{field} is required")]
    EmptyText {
        /// Name of the offending field
        field: &'static str,
    },

    /// `from` was not one of host, remote1, remote2
    #[error("unknown origin '{0}', expected one of host, remote1, remote2")]
    UnknownOrigin(String),
}

fn require_text(field: &'static str, text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText { field });
    }
    Ok(())
}

/// A persisted todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Server-assigned identifier
    pub id: i64,
    /// What needs doing
    pub text: String,
    /// Whether it is done
    pub completed: bool,
    /// Server-assigned insertion time
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    /// Text of the new todo
    pub text: String,
}

impl NewTodo {
    /// Create a request body.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reject blank text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] when `text` is blank.
    pub fn validate(self) -> Result<Self, ValidationError> {
        require_text("text", &self.text)?;
        Ok(self)
    }
}

/// Body of `PATCH /todos/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    /// Replacement text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replacement completion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Patch that only sets `completed`.
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    /// Patch that only sets `text`.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    /// True when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Reject a present-but-blank `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] when `text` is present and blank.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if let Some(text) = &self.text {
            require_text("text", text)?;
        }
        Ok(self)
    }
}

/// A persisted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Server-assigned identifier
    pub id: i64,
    /// Message body
    pub text: String,
    /// Sending application
    pub from: Origin,
    /// Server-assigned insertion time
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Message body
    pub text: String,
    /// Sending application
    pub from: Origin,
}

impl NewMessage {
    /// Create a request body.
    #[must_use]
    pub fn new(text: impl Into<String>, from: Origin) -> Self {
        Self {
            text: text.into(),
            from,
        }
    }

    /// Reject blank text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] when `text` is blank.
    pub fn validate(self) -> Result<Self, ValidationError> {
        require_text("text", &self.text)?;
        Ok(self)
    }
}

/// `{ "success": true }` acknowledgement for deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always true on success
    pub success: bool,
}

impl SuccessResponse {
    /// The only value the service sends.
    pub const OK: Self = Self { success: true };
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when the process is up
    pub status: String,
    /// Service banner
    pub message: String,
}

impl HealthResponse {
    /// Service banner returned by the root endpoint.
    pub const BANNER: &'static str = "Micro Frontend API";

    /// The healthy response.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: Self::BANNER.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn origin_round_trips_through_str() {
        for origin in Origin::ALL {
            assert_eq!(origin.as_str().parse::<Origin>().unwrap(), origin);
        }
    }

    #[test]
    fn unknown_origin_is_rejected() {
        let err = "remote3".parse::<Origin>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownOrigin("remote3".to_string()));
    }

    #[test]
    fn todo_serializes_camel_case() {
        let todo = Todo {
            id: 7,
            text: "ship it".to_string(),
            completed: false,
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
        };
        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value["createdAt"], json!("2025-01-01T00:00:00Z"));
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn message_origin_is_lowercase_on_the_wire() {
        let body: NewMessage =
            serde_json::from_value(json!({ "text": "hi", "from": "remote2" })).unwrap();
        assert_eq!(body.from, Origin::Remote2);
        let unknown = json!({ "text": "hi", "from": "admin" });
        assert!(serde_json::from_value::<NewMessage>(unknown).is_err());
    }

    #[test]
    fn blank_text_fails_validation() {
        assert_eq!(
            NewTodo::new("   ").validate().unwrap_err(),
            ValidationError::EmptyText { field: "text" }
        );
        assert!(NewMessage::new("", Origin::Host).validate().is_err());
    }

    #[test]
    fn patch_validation_only_checks_present_text() {
        assert!(TodoPatch::completed(true).validate().is_ok());
        assert!(TodoPatch::text(" ").validate().is_err());
        assert!(TodoPatch::default().is_empty());
    }

    #[test]
    fn patch_omits_absent_fields() {
        let value = serde_json::to_value(TodoPatch::completed(true)).unwrap();
        assert_eq!(value, json!({ "completed": true }));
    }
}
