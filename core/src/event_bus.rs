//! Page-wide custom event contract.
//!
//! Remotes never depend on each other at compile time. When one of them needs
//! another to act, it dispatches a named event on the page and whoever is
//! listening reacts. This module defines the contract; the page implementation
//! lives in `mfe-runtime`.
//!
//! # Delivery
//!
//! - **Fire-and-forget**: the dispatcher learns only how many listeners were
//!   invoked
//! - **At most once**: every listener registered at dispatch time gets one
//!   delivery attempt
//! - **Plain data**: payloads are JSON values
//!
//! ```text
//! ┌──────────┐  dispatch("mf:add-todo", {text})  ┌──────────┐
//! │ remote1  │ ─────────────────────────────────► │   page   │
//! └──────────┘                                    └────┬─────┘
//!                                                      │ listeners
//!                                                      ▼
//!                                                 ┌──────────┐
//!                                                 │ remote2  │
//!                                                 └──────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use mfe_core::event_bus::{AddTodoRequested, EventBusExt};
//!
//! let _listener = page.events().listen_typed(|event: AddTodoRequested| {
//!     println!("asked to add {}", event.text);
//! });
//! page.events().dispatch(&AddTodoRequested::new("buy milk"))?;
//! ```

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while dispatching events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    /// The payload could not be converted to JSON
    #[error("Failed to serialize payload for '{event}': {reason}")]
    SerializationFailed {
        /// Event name
        event: String,
        /// Serializer message
        reason: String,
    },

    /// Event names must be non-empty
    #[error("Invalid event name: {0:?}")]
    InvalidName(String),
}

/// Raw listener callback. Receives the event detail.
pub type RawListener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Identifier of a registered listener, used to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A typed custom event with a well-known name.
pub trait CustomEvent: Serialize + DeserializeOwned {
    /// Page-wide event name
    const NAME: &'static str;
}

/// Request from one remote to add a todo in whichever remote owns the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTodoRequested {
    /// Text of the todo to add
    pub text: String,
}

impl AddTodoRequested {
    /// Build the event payload.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl CustomEvent for AddTodoRequested {
    const NAME: &'static str = "mf:add-todo";
}

/// Untyped page event bus.
///
/// Kept dyn-compatible so applications can hold `Arc<dyn EventBus>`; typed
/// helpers live on [`EventBusExt`].
pub trait EventBus: Send + Sync {
    /// Invoke every listener registered for `name` with `detail`.
    ///
    /// Returns the number of listeners invoked.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::InvalidName`] for an empty name.
    fn dispatch_raw(&self, name: &str, detail: Value) -> Result<usize, EventBusError>;

    /// Register a listener for `name`.
    fn add_listener(&self, name: &str, listener: RawListener) -> ListenerId;

    /// Remove a listener. Returns false if it was not registered.
    fn remove_listener(&self, name: &str, id: ListenerId) -> bool;

    /// Number of listeners currently registered for `name`.
    fn listener_count(&self, name: &str) -> usize;
}

/// Typed helpers over any [`EventBus`].
pub trait EventBusExt: EventBus {
    /// Serialize `event` and dispatch it under [`CustomEvent::NAME`].
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::SerializationFailed`] if the payload cannot be
    /// turned into JSON.
    fn dispatch<E: CustomEvent>(&self, event: &E) -> Result<usize, EventBusError> {
        let detail =
            serde_json::to_value(event).map_err(|e| EventBusError::SerializationFailed {
                event: E::NAME.to_string(),
                reason: e.to_string(),
            })?;
        self.dispatch_raw(E::NAME, detail)
    }

    /// Register a typed listener. Payloads that do not decode as `E` are
    /// skipped.
    fn listen_typed<E, F>(&self, handler: F) -> ListenerId
    where
        E: CustomEvent + 'static,
        F: Fn(E) + Send + Sync + 'static,
    {
        self.add_listener(
            E::NAME,
            Arc::new(move |detail: &Value| {
                if let Ok(event) = serde_json::from_value::<E>(detail.clone()) {
                    handler(event);
                }
            }),
        )
    }
}

impl<T: EventBus + ?Sized> EventBusExt for T {}
