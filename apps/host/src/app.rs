//! The host shell.
//!
//! Owns the navigation state, loads remotes through [`ModuleFederation`],
//! mounts them with props, and observes the shared message log.

use mfe_core::types::{NewMessage, Origin, ValidationError};
use mfe_runtime::{
    Component, ComponentSpecifier, FederationError, ModuleFederation, MountContext, Page, Props,
    SharedStore, Subscription,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Page heading.
pub const HEADING: &str = "Micro Frontend Host";

/// Heading of the home view.
pub const WELCOME: &str = "Welcome to Micro Frontend Demo";

/// Hint shown on the home view.
pub const HOME_HINT: &str = "Select an app from the navigation above.";

/// Specifier of the counter remote.
pub const REMOTE1_APP: &str = "remote1/App";

/// Specifier of the todo-list remote.
pub const REMOTE2_APP: &str = "remote2/App";

/// Errors from host actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A remote could not be loaded
    #[error(transparent)]
    Federation(#[from] FederationError),

    /// Blank message or user name
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown navigation target
    #[error("unknown view: {0}")]
    UnknownView(String),
}

/// What the main area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Welcome text, no remotes
    #[default]
    Home,
    /// Counter only
    Remote1,
    /// Todo list only
    Remote2,
    /// Both remotes side by side
    Both,
}

impl ViewMode {
    /// Navigation order.
    pub const ALL: [Self; 4] = [Self::Remote1, Self::Remote2, Self::Both, Self::Home];

    /// Remotes shown in this mode.
    #[must_use]
    pub const fn specifiers(self) -> &'static [&'static str] {
        match self {
            Self::Home => &[],
            Self::Remote1 => &[REMOTE1_APP],
            Self::Remote2 => &[REMOTE2_APP],
            Self::Both => &[REMOTE1_APP, REMOTE2_APP],
        }
    }

    /// Navigation button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Remote1 => "Remote App 1",
            Self::Remote2 => "Remote App 2",
            Self::Both => "Both",
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Remote1 => "remote1",
            Self::Remote2 => "remote2",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| HostError::UnknownView(s.to_string()))
    }
}

/// Title prop handed to a remote: the label of its navigation button.
fn title_for(specifier: &str) -> &'static str {
    match specifier {
        REMOTE1_APP => ViewMode::Remote1.label(),
        REMOTE2_APP => ViewMode::Remote2.label(),
        _ => "",
    }
}

/// The host application.
pub struct HostApp {
    page: Page,
    store: SharedStore,
    federation: ModuleFederation,
    view: ViewMode,
    mounted: BTreeMap<String, Box<dyn Component>>,
    last_count: Arc<Mutex<Option<i64>>>,
    messages_seen: Arc<AtomicUsize>,
    _message_log: Subscription,
}

impl HostApp {
    /// Host on `page`, resolving remotes through `federation`. Starts on the
    /// home view with nothing mounted.
    #[must_use]
    pub fn new(page: Page, federation: ModuleFederation) -> Self {
        let store = SharedStore::get_or_create(&page);
        let messages_seen = Arc::new(AtomicUsize::new(store.with_state(|s| s.messages.len())));

        let seen = Arc::clone(&messages_seen);
        let message_log = store.subscribe(move |state| {
            seen.store(state.messages.len(), Ordering::Release);
        });

        Self {
            page,
            store,
            federation,
            view: ViewMode::Home,
            mounted: BTreeMap::new(),
            last_count: Arc::new(Mutex::new(None)),
            messages_seen,
            _message_log: message_log,
        }
    }

    /// Current view.
    #[must_use]
    pub const fn view(&self) -> ViewMode {
        self.view
    }

    /// The page the host and its remotes share.
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// The shared store.
    #[must_use]
    pub const fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Switch views: unmount remotes the new view does not show, then load
    /// and mount the ones it adds.
    ///
    /// Every needed remote is loaded before anything changes, so a failed
    /// load leaves the current view in place.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Federation`] if a remote cannot be loaded.
    #[tracing::instrument(skip(self), fields(from = %self.view))]
    pub async fn navigate(&mut self, view: ViewMode) -> Result<(), HostError> {
        let wanted = view.specifiers();

        let mut incoming = Vec::new();
        for specifier in wanted {
            if !self.mounted.contains_key(*specifier) {
                let component = self.federation.load_component(specifier).await?;
                incoming.push(((*specifier).to_string(), component));
            }
        }

        let leaving: Vec<String> = self
            .mounted
            .keys()
            .filter(|specifier| !wanted.iter().any(|w| *w == specifier.as_str()))
            .cloned()
            .collect();
        for specifier in leaving {
            if let Some(mut component) = self.mounted.remove(&specifier) {
                component.unmount();
            }
        }

        for (specifier, mut component) in incoming {
            component.mount(MountContext::new(self.page.clone(), self.props_for(&specifier)));
            component.after_mount().await;
            self.mounted.insert(specifier, component);
        }

        tracing::info!(to = %view, mounted = ?self.mounted_specifiers(), "navigated");
        self.view = view;
        Ok(())
    }

    fn props_for(&self, specifier: &str) -> Props {
        let user = self.store.global_user().map_or(Value::Null, Value::String);
        let last_count = Arc::clone(&self.last_count);
        let remote = ComponentSpecifier::parse(specifier)
            .map(|s| s.remote)
            .unwrap_or_default();

        Props::new()
            .with_value("title", title_for(specifier))
            .with_value("user", user)
            .with_callback(mfe_remote1::ON_COUNT_CHANGE, move |value| {
                let count = value.as_i64();
                tracing::debug!(remote = %remote, ?count, "count changed");
                *last_count.lock() = count;
            })
    }

    /// Specifiers of the mounted remotes, sorted.
    #[must_use]
    pub fn mounted_specifiers(&self) -> Vec<&str> {
        self.mounted.keys().map(String::as_str).collect()
    }

    /// Mounted component for `specifier`.
    #[must_use]
    pub fn component(&self, specifier: &str) -> Option<&dyn Component> {
        self.mounted.get(specifier).map(|component| &**component)
    }

    /// Mounted component for `specifier` as its concrete type.
    #[must_use]
    pub fn component_as<T: 'static>(&self, specifier: &str) -> Option<&T> {
        self.mounted
            .get(specifier)
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    /// Mutable counterpart of [`component_as`](Self::component_as).
    pub fn component_as_mut<T: 'static>(&mut self, specifier: &str) -> Option<&mut T> {
        self.mounted
            .get_mut(specifier)
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// Last count reported through `onCountChange`.
    #[must_use]
    pub fn last_count(&self) -> Option<i64> {
        *self.last_count.lock()
    }

    /// Length of the message log as last observed by the host.
    #[must_use]
    pub fn messages_seen(&self) -> usize {
        self.messages_seen.load(Ordering::Acquire)
    }

    /// Sign `user` in for every application on the page.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Validation`] for a blank name.
    pub fn login(&self, user: &str) -> Result<(), HostError> {
        let user = user.trim();
        if user.is_empty() {
            return Err(ValidationError::EmptyText { field: "user" }.into());
        }
        self.store.set_global_user(Some(user.to_string()));
        Ok(())
    }

    /// Sign out.
    pub fn logout(&self) {
        self.store.set_global_user(None);
    }

    /// Post `text` to the shared log as `host`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Validation`] for blank text.
    pub fn broadcast(&self, text: impl Into<String>) -> Result<i64, HostError> {
        let message = NewMessage::new(text, Origin::Host).validate()?;
        Ok(self.store.add_message(message.text, message.from))
    }

    /// Empty the shared log.
    pub fn clear_messages(&self) {
        self.store.clear_messages();
    }
}

impl Drop for HostApp {
    fn drop(&mut self) {
        for component in self.mounted.values_mut() {
            component.unmount();
        }
    }
}

impl fmt::Debug for HostApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostApp")
            .field("view", &self.view)
            .field("mounted", &self.mounted_specifiers())
            .field("federation", &self.federation)
            .finish_non_exhaustive()
    }
}
