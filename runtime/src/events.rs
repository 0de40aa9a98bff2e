//! Page event target, the runtime side of [`mfe_core::event_bus`].
//!
//! Dispatch is synchronous: listeners run on the dispatching thread before
//! [`EventBus::dispatch_raw`] returns. The listener list is copied before any
//! listener runs, so listeners may add or remove listeners (including
//! themselves) without deadlocking; such changes take effect from the next
//! dispatch.

use mfe_core::event_bus::{
    CustomEvent, EventBus, EventBusError, EventBusExt, ListenerId, RawListener,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

#[derive(Default)]
struct Listeners {
    by_name: Mutex<HashMap<String, Vec<(ListenerId, RawListener)>>>,
    next_id: AtomicU64,
}

/// In-process page event bus. Cloning shares the same listener table.
#[derive(Clone, Default)]
pub struct PageEventBus {
    inner: Arc<Listeners>,
}

impl PageEventBus {
    /// Create an event bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed listener and return a guard that removes it on drop.
    pub fn listen<E, F>(&self, handler: F) -> EventListener
    where
        E: CustomEvent + 'static,
        F: Fn(E) + Send + Sync + 'static,
    {
        let id = self.listen_typed(handler);
        EventListener {
            bus: Arc::downgrade(&self.inner),
            name: E::NAME.to_string(),
            id,
        }
    }
}

fn remove(inner: &Listeners, name: &str, id: ListenerId) -> bool {
    let mut by_name = inner.by_name.lock();
    let Some(listeners) = by_name.get_mut(name) else {
        return false;
    };
    let before = listeners.len();
    listeners.retain(|(existing, _)| *existing != id);
    let removed = listeners.len() != before;
    if listeners.is_empty() {
        by_name.remove(name);
    }
    removed
}

impl EventBus for PageEventBus {
    fn dispatch_raw(&self, name: &str, detail: Value) -> Result<usize, EventBusError> {
        if name.is_empty() {
            return Err(EventBusError::InvalidName(name.to_string()));
        }

        let targets: Vec<RawListener> = self
            .inner
            .by_name
            .lock()
            .get(name)
            .map(|listeners| listeners.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        tracing::debug!(event = name, listeners = targets.len(), "dispatching page event");

        for listener in &targets {
            listener(&detail);
        }
        Ok(targets.len())
    }

    fn add_listener(&self, name: &str, listener: RawListener) -> ListenerId {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .by_name
            .lock()
            .entry(name.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    fn remove_listener(&self, name: &str, id: ListenerId) -> bool {
        remove(&self.inner, name, id)
    }

    fn listener_count(&self, name: &str) -> usize {
        self.inner.by_name.lock().get(name).map_or(0, Vec::len)
    }
}

/// Guard for a listener registered with [`PageEventBus::listen`].
///
/// Dropping the guard removes the listener.
#[must_use = "dropping the guard removes the listener immediately"]
pub struct EventListener {
    bus: Weak<Listeners>,
    name: String,
    id: ListenerId,
}

impl EventListener {
    /// Event name this listener is registered for.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.name
    }

    /// Remove the listener now.
    pub fn remove(self) {
        drop(self);
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            remove(&inner, &self.name, self.id);
        }
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListener")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}
