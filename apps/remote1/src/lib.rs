//! # Remote App 1 - Counter
//!
//! An independently built remote exposing `./App`. The counter reports every
//! change to its parent through the `onCountChange` prop callback, greets the
//! user held in the shared store, posts to the shared message log, and asks
//! whichever remote owns the todo list to add an item via `mf:add-todo`.
//!
//! ## Example
//!
//! ```
//! use mfe_remote1::CounterApp;
//! use mfe_runtime::{Component, MountContext, Page, Props, SharedStore};
//!
//! let page = Page::new();
//! let mut counter = CounterApp::new();
//! counter.mount(MountContext::new(page.clone(), Props::new()));
//!
//! assert_eq!(counter.increment(), 1);
//! counter.post_message("hello from remote1").unwrap();
//! assert_eq!(SharedStore::get_or_create(&page).snapshot().messages.len(), 1);
//! ```

use mfe_core::event_bus::{AddTodoRequested, EventBusError, EventBusExt};
use mfe_core::types::{NewMessage, NewTodo, Origin, ValidationError};
use mfe_runtime::{Component, MountContext, Page, Props, RemoteEntry, SharedStore, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// Remote name in the federation manifest.
pub const REMOTE_NAME: &str = "remote1";

/// Default heading.
pub const TITLE: &str = "Remote App 1 - Counter";

/// Text shown under the heading.
pub const DESCRIPTION: &str = "This component is loaded from a separate micro frontend.";

/// Prop callback invoked with the new count.
pub const ON_COUNT_CHANGE: &str = "onCountChange";

/// Errors from counter actions that need the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CounterError {
    /// The action needs a mounted component
    #[error("counter is not mounted")]
    NotMounted,

    /// Blank text
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The page event could not be dispatched
    #[error(transparent)]
    Event(#[from] EventBusError),
}

struct Mounted {
    page: Page,
    props: Props,
    store: SharedStore,
    _user_watch: Subscription,
}

/// Model behind the counter view.
pub struct CounterApp {
    count: i64,
    user: Arc<Mutex<Option<String>>>,
    mounted: Option<Mounted>,
}

impl CounterApp {
    /// Unmounted counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: 0,
            user: Arc::new(Mutex::new(None)),
            mounted: None,
        }
    }

    /// Current count.
    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    /// Heading: the `title` prop if the parent passed one, else [`TITLE`].
    #[must_use]
    pub fn title(&self) -> String {
        self.mounted
            .as_ref()
            .and_then(|m| m.props.get::<String>("title"))
            .unwrap_or_else(|| TITLE.to_string())
    }

    /// Greeting for the user currently signed in through the shared store.
    #[must_use]
    pub fn greeting(&self) -> String {
        match self.user.lock().as_deref() {
            Some(user) => format!("Hello, {user}!"),
            None => "Hello, guest!".to_string(),
        }
    }

    /// Add one and report the new count.
    pub fn increment(&mut self) -> i64 {
        self.set_count(self.count.saturating_add(1))
    }

    /// Subtract one and report the new count.
    pub fn decrement(&mut self) -> i64 {
        self.set_count(self.count.saturating_sub(1))
    }

    fn set_count(&mut self, count: i64) -> i64 {
        self.count = count;
        if let Some(mounted) = &self.mounted {
            mounted.props.emit(ON_COUNT_CHANGE, count);
        }
        count
    }

    /// Append `text` to the shared message log as `remote1`.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::NotMounted`] before mount and
    /// [`CounterError::Validation`] for blank text.
    pub fn post_message(&self, text: impl Into<String>) -> Result<i64, CounterError> {
        let mounted = self.mounted.as_ref().ok_or(CounterError::NotMounted)?;
        let message = NewMessage::new(text, Origin::Remote1).validate()?;
        Ok(mounted.store.add_message(message.text, message.from))
    }

    /// Dispatch `mf:add-todo` on the page. Returns how many listeners saw it;
    /// zero is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::NotMounted`] before mount,
    /// [`CounterError::Validation`] for blank text, or the dispatch error.
    pub fn request_todo(&self, text: impl Into<String>) -> Result<usize, CounterError> {
        let mounted = self.mounted.as_ref().ok_or(CounterError::NotMounted)?;
        let todo = NewTodo::new(text).validate()?;
        let delivered = mounted
            .page
            .events()
            .dispatch(&AddTodoRequested::new(todo.text))?;
        if delivered == 0 {
            tracing::debug!("add-todo request had no listener");
        }
        Ok(delivered)
    }
}

impl Default for CounterApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CounterApp {
    fn name(&self) -> &str {
        TITLE
    }

    fn mount(&mut self, ctx: MountContext) {
        self.unmount();

        let MountContext { page, props } = ctx;
        let store = SharedStore::get_or_create(&page);
        *self.user.lock() = store.global_user();

        let user = Arc::clone(&self.user);
        let user_watch = store.subscribe(move |state| {
            let mut current = user.lock();
            if *current != state.global_user {
                current.clone_from(&state.global_user);
            }
        });

        tracing::info!(remote = REMOTE_NAME, "counter mounted");
        self.mounted = Some(Mounted {
            page,
            props,
            store,
            _user_watch: user_watch,
        });
    }

    fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            tracing::info!(remote = REMOTE_NAME, "counter unmounted");
        }
    }

    fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Entry exposing `./App`.
#[must_use]
pub fn remote_entry() -> RemoteEntry {
    RemoteEntry::new(REMOTE_NAME).expose("./App", || Box::new(CounterApp::new()))
}
