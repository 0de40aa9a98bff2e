//! Global registry: well-known slots shared by every bundle on a page.
//!
//! A value created inside one bundle's module scope is invisible to the
//! others, so anything that must be page-wide is published here under a
//! fixed key and looked up by every bundle before it builds its own.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

type Slot = Arc<dyn Any + Send + Sync>;

/// Keyed slots holding type-erased, cloneable handles.
#[derive(Default)]
pub struct GlobalRegistry {
    slots: Mutex<HashMap<String, Slot>>,
}

impl GlobalRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value under `key`, creating it with `init` if the slot is
    /// empty.
    ///
    /// The lookup and the insertion happen under one lock, so concurrent
    /// callers always agree on a single value. A slot holding a value of a
    /// different type is overwritten.
    pub fn get_or_insert_with<T, F>(&self, key: &str, init: F) -> T
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce() -> T,
    {
        let mut slots = self.slots.lock();
        if let Some(existing) = slots.get(key) {
            if let Some(value) = existing.downcast_ref::<T>() {
                tracing::trace!(key, "registry slot discovered");
                return value.clone();
            }
            tracing::warn!(key, "registry slot holds a value of another type, replacing it");
        }

        let value = init();
        slots.insert(key.to_string(), Arc::new(value.clone()));
        tracing::debug!(key, "registry slot published");
        value
    }

    /// Look up `key` without creating it.
    #[must_use]
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone + Send + Sync,
    {
        self.slots
            .lock()
            .get(key)
            .and_then(|slot| slot.downcast_ref::<T>())
            .cloned()
    }

    /// Whether anything is published under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slots.lock().contains_key(key)
    }

    /// Published keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.slots.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for GlobalRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
