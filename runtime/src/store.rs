//! Cross-bundle shared store.
//!
//! One [`SharedStore`] exists per page. It is published in the page's global
//! registry under [`GLOBAL_STORE_KEY`] by whichever bundle asks for it first;
//! every later call to [`SharedStore::get_or_create`] returns a handle to that
//! same instance.
//!
//! # Notification
//!
//! Every mutation notifies all subscribers synchronously with a snapshot of
//! the full state taken right after the mutation. Mutations are serialized by
//! a re-entrant dispatch lock, so each listener observes mutations one at a
//! time and in order, and a listener may itself mutate the store (the nested
//! notification completes before the outer one continues).
//!
//! Async observers can use [`SharedStore::watch`] instead of a callback.

use crate::ids::TimeOrderedIds;
use crate::page::Page;
use chrono::{DateTime, Utc};
use mfe_core::environment::{Clock, SystemClock};
use mfe_core::types::Origin;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;

/// Registry key the store is published under.
pub const GLOBAL_STORE_KEY: &str = "__MF_GLOBAL_STORE__";

/// A message in the shared log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreMessage {
    /// Time-derived, strictly increasing id
    pub id: i64,
    /// Message body
    pub text: String,
    /// Application that posted it
    pub from: Origin,
    /// When it was posted
    pub timestamp: DateTime<Utc>,
}

/// Full state of the shared store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedState {
    /// Currently signed-in user, shared by all applications
    pub global_user: Option<String>,
    /// Message log in insertion order
    pub messages: Vec<StoreMessage>,
}

type Listener = Arc<dyn Fn(&SharedState) + Send + Sync>;

struct StoreInner {
    state: RwLock<SharedState>,
    dispatch: ReentrantMutex<()>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
    ids: TimeOrderedIds,
    clock: Arc<dyn Clock>,
    changes: watch::Sender<SharedState>,
}

/// Handle to the shared store. Cloning shares the same instance.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<StoreInner>,
}

impl SharedStore {
    /// Return the page's store, creating and publishing it if this is the
    /// first request on `page`.
    #[must_use]
    pub fn get_or_create(page: &Page) -> Self {
        Self::get_or_create_with_clock(page, Arc::new(SystemClock))
    }

    /// Like [`get_or_create`](Self::get_or_create), with the clock used if the
    /// store has to be created. An existing store keeps its own clock.
    #[must_use]
    pub fn get_or_create_with_clock(page: &Page, clock: Arc<dyn Clock>) -> Self {
        page.globals()
            .get_or_insert_with(GLOBAL_STORE_KEY, || {
                tracing::info!(key = GLOBAL_STORE_KEY, "creating shared store");
                Self::detached(clock)
            })
    }

    /// The store of the process-wide page.
    #[must_use]
    pub fn global() -> Self {
        Self::get_or_create(&Page::global())
    }

    /// A store not published anywhere. Only useful in tests.
    #[must_use]
    pub fn detached(clock: Arc<dyn Clock>) -> Self {
        let (changes, _) = watch::channel(SharedState::default());
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(SharedState::default()),
                dispatch: ReentrantMutex::new(()),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
                ids: TimeOrderedIds::new(),
                clock,
                changes,
            }),
        }
    }

    /// Whether two handles refer to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SharedState {
        self.inner.state.read().clone()
    }

    /// Read the current state without cloning it.
    pub fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&SharedState) -> T,
    {
        f(&*self.inner.state.read())
    }

    /// Currently signed-in user.
    #[must_use]
    pub fn global_user(&self) -> Option<String> {
        self.inner.state.read().global_user.clone()
    }

    /// Replace the signed-in user.
    pub fn set_global_user(&self, user: Option<String>) {
        tracing::debug!(user = ?user, "set global user");
        self.mutate(|state| state.global_user = user);
    }

    /// Append a message and return its id.
    ///
    /// The id is taken under the dispatch lock, so the log stays ordered by
    /// id when several threads post at once.
    pub fn add_message(&self, text: impl Into<String>, from: Origin) -> i64 {
        let text = text.into();
        let mut id = 0;
        self.mutate(|state| {
            let timestamp = self.inner.clock.now();
            id = self.inner.ids.next(timestamp);
            tracing::debug!(id, from = %from, "add message");
            state.messages.push(StoreMessage {
                id,
                text,
                from,
                timestamp,
            });
        });
        id
    }

    /// Drop every message.
    pub fn clear_messages(&self) {
        tracing::debug!("clear messages");
        self.mutate(|state| state.messages.clear());
    }

    /// Register `listener`; it is called with the full state after every
    /// mutation until the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SharedState) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// Async view of the state; the receiver sees the latest snapshot after
    /// each mutation.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SharedState> {
        self.inner.changes.subscribe()
    }

    fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut SharedState),
    {
        let _dispatch = self.inner.dispatch.lock();

        let snapshot = {
            let mut state = self.inner.state.write();
            f(&mut *state);
            state.clone()
        };
        self.inner.changes.send_replace(snapshot.clone());

        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in &listeners {
            listener(&snapshot);
        }
    }
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("state", &*self.inner.state.read())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Live subscription to a [`SharedStore`]. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    /// Stop receiving notifications.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner.listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
