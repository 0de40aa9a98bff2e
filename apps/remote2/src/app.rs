//! The todo list component.
//!
//! Every action tries the API first. When the call fails the list changes
//! locally anyway, so the view stays usable with the API down; such items
//! are tagged [`TodoSource::Local`] and can be pushed later with
//! [`TodoListApp::sync_pending`].

use crate::model::{TodoItem, TodoSource, seed_todos};
use futures::future::BoxFuture;
use mfe_client::ApiClient;
use mfe_core::environment::{Clock, SystemClock};
use mfe_core::event_bus::AddTodoRequested;
use mfe_core::types::{Origin, TodoPatch};
use mfe_runtime::{
    Component, EventListener, MountContext, RemoteEntry, SharedStore, TimeOrderedIds,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Remote name in the federation manifest.
pub const REMOTE_NAME: &str = "remote2";

/// Heading.
pub const TITLE: &str = "Remote App 2 - Todo List";

/// Text shown under the heading.
pub const DESCRIPTION: &str = "This component is loaded from another micro frontend.";

struct ListState {
    items: Mutex<Vec<TodoItem>>,
    ids: TimeOrderedIds,
    clock: Arc<dyn Clock>,
}

impl ListState {
    fn push_unsaved(&self, text: String, source: TodoSource) -> TodoItem {
        let item = TodoItem::unsaved(self.ids.next(self.clock.now()), text, source);
        self.items.lock().push(item.clone());
        item
    }

    fn replace(&self, old: &TodoItem, item: TodoItem) {
        if let Some(slot) = self.items.lock().iter_mut().find(|t| same_item(t, old)) {
            *slot = item;
        }
    }

    fn flip(&self, target: &TodoItem) -> Option<TodoItem> {
        let mut items = self.items.lock();
        let item = items.iter_mut().find(|t| same_item(t, target))?;
        item.completed = !item.completed;
        Some(item.clone())
    }

    fn remove(&self, target: &TodoItem) -> bool {
        let mut items = self.items.lock();
        match items.iter().position(|t| same_item(t, target)) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    fn get(&self, id: i64) -> Option<TodoItem> {
        self.items.lock().iter().find(|t| t.id == id).cloned()
    }
}

fn same_item(a: &TodoItem, b: &TodoItem) -> bool {
    a.id == b.id && a.source == b.source
}

fn announce(store: &SharedStore, text: &str) {
    store.add_message(format!("Added todo: {text}"), Origin::Remote2);
}

struct Mounted {
    store: SharedStore,
    _add_todo: EventListener,
}

/// Model behind the todo list view.
pub struct TodoListApp {
    client: ApiClient,
    state: Arc<ListState>,
    mounted: Option<Mounted>,
}

impl TodoListApp {
    /// List over `client`, starting from the seed items.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self::with_clock(client, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new), with the clock used for local ids.
    #[must_use]
    pub fn with_clock(client: ApiClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            state: Arc::new(ListState {
                items: Mutex::new(seed_todos()),
                ids: TimeOrderedIds::new(),
                clock,
            }),
            mounted: None,
        }
    }

    /// Current items in display order.
    #[must_use]
    pub fn todos(&self) -> Vec<TodoItem> {
        self.state.items.lock().clone()
    }

    /// Fetch the list from the API.
    ///
    /// On success the seed and previously fetched items are replaced by the
    /// server rows; items that only exist locally stay at the end. On failure
    /// the list is left alone and [`TodoSource::Seed`] is returned.
    pub async fn load(&self) -> TodoSource {
        match self.client.get_todos().await {
            Ok(todos) => {
                let mut items = self.state.items.lock();
                let pending: Vec<TodoItem> = items
                    .drain(..)
                    .filter(|item| item.source.is_pending())
                    .collect();
                items.extend(todos.into_iter().map(TodoItem::from));
                items.extend(pending);
                tracing::info!(count = items.len(), "loaded todos");
                TodoSource::Server
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load todos, keeping local list");
                TodoSource::Seed
            }
        }
    }

    /// Add an item. Blank input is ignored and yields `None`.
    ///
    /// The text is kept as typed; only the emptiness check trims it.
    pub async fn add(&self, text: impl Into<String>) -> Option<TodoItem> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }

        let item = match self.client.create_todo(&text).await {
            Ok(todo) => {
                let item = TodoItem::from(todo);
                self.state.items.lock().push(item.clone());
                item
            }
            Err(e) => {
                tracing::warn!(error = %e, "create failed, adding locally");
                self.state.push_unsaved(text, TodoSource::Local)
            }
        };

        if let Some(mounted) = &self.mounted {
            announce(&mounted.store, &item.text);
        }
        Some(item)
    }

    /// Flip the done flag of `id`. Returns the updated item, or `None` if the
    /// list has no such id.
    pub async fn toggle(&self, id: i64) -> Option<TodoItem> {
        let current = self.state.get(id)?;
        if current.source != TodoSource::Server {
            return self.state.flip(&current);
        }

        match self
            .client
            .update_todo(id, TodoPatch::completed(!current.completed))
            .await
        {
            Ok(todo) => {
                let item = TodoItem::from(todo);
                self.state.replace(&current, item.clone());
                Some(item)
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "update failed, toggling locally");
                self.state.flip(&current)
            }
        }
    }

    /// Remove `id`. Returns whether the list had it.
    pub async fn delete(&self, id: i64) -> bool {
        let Some(current) = self.state.get(id) else {
            return false;
        };

        if current.source == TodoSource::Server {
            match self.client.delete_todo(id).await {
                Err(e) if !e.is_not_found() => {
                    tracing::warn!(id, error = %e, "delete failed, removing locally");
                }
                _ => {}
            }
        }
        self.state.remove(&current)
    }

    /// Push every local and event-sourced item to the API. Returns how many
    /// were persisted; the rest stay pending.
    pub async fn sync_pending(&self) -> usize {
        let pending: Vec<TodoItem> = self
            .state
            .items
            .lock()
            .iter()
            .filter(|item| item.source.is_pending())
            .cloned()
            .collect();

        let mut synced = 0;
        for item in pending {
            match self.client.create_todo(&item.text).await {
                Ok(todo) => {
                    let mut saved = TodoItem::from(todo);
                    if item.completed && !saved.completed {
                        if let Ok(todo) = self
                            .client
                            .update_todo(saved.id, TodoPatch::completed(true))
                            .await
                        {
                            saved = TodoItem::from(todo);
                        }
                    }
                    self.state.replace(&item, saved);
                    synced += 1;
                }
                Err(e) => {
                    tracing::warn!(id = item.id, error = %e, "sync failed");
                    break;
                }
            }
        }
        synced
    }
}

impl Component for TodoListApp {
    fn name(&self) -> &str {
        TITLE
    }

    fn mount(&mut self, ctx: MountContext) {
        self.unmount();

        let store = SharedStore::get_or_create(&ctx.page);
        let state = Arc::clone(&self.state);
        let announcer = store.clone();
        let listener = ctx.page.events().listen(move |event: AddTodoRequested| {
            if event.text.trim().is_empty() {
                tracing::debug!("ignoring blank add-todo request");
                return;
            }
            let item = state.push_unsaved(event.text, TodoSource::Event);
            tracing::info!(id = item.id, "added todo from page event");
            announce(&announcer, &item.text);
        });

        tracing::info!(remote = REMOTE_NAME, "todo list mounted");
        self.mounted = Some(Mounted {
            store,
            _add_todo: listener,
        });
    }

    fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            tracing::info!(remote = REMOTE_NAME, "todo list unmounted");
        }
    }

    fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    fn after_mount(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.load().await;
        })
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Entry exposing `./App`; every instance talks to the API through `client`.
#[must_use]
pub fn remote_entry(client: ApiClient) -> RemoteEntry {
    RemoteEntry::new(REMOTE_NAME).expose("./App", move || {
        Box::new(TodoListApp::new(client.clone()))
    })
}
