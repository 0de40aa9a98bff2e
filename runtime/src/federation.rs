//! Module federation: composing independently built applications at runtime.
//!
//! A host never links against its remotes' code paths directly. It knows a
//! [`FederationManifest`] (remote name → entry URL), asks a [`RemoteLoader`]
//! to fetch each remote's [`RemoteEntry`], and instantiates the components the
//! entry exposes. A component only sees its [`MountContext`]: the page it is
//! mounted on and the [`Props`] its parent passed down. It talks back to the
//! parent only through prop callbacks.
//!
//! # Flow
//!
//! ```text
//! host ── load_component("remote2/App") ──► ModuleFederation
//!                                              │ manifest: remote2 → url
//!                                              ▼
//!                                          RemoteLoader::load_entry(remote2, url)
//!                                              │ (cached after first load)
//!                                              ▼
//!                                          RemoteEntry::instantiate("./App")
//!                                              │
//!                                              ▼
//!                                          Box<dyn Component> ── mount(ctx)
//! ```

use crate::page::Page;
use futures::future::BoxFuture;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while resolving federated components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FederationError {
    /// Specifier was not of the form `remote/Module`
    #[error("Invalid component specifier: {0:?}")]
    InvalidSpecifier(String),

    /// Manifest has no entry for this remote
    #[error("Unknown remote: {0}")]
    UnknownRemote(String),

    /// The loader could not produce the remote entry
    #[error("Failed to load remote '{remote}' from {url}: {reason}")]
    EntryUnavailable {
        /// Remote name
        remote: String,
        /// Entry URL from the manifest
        url: String,
        /// Loader message
        reason: String,
    },

    /// The remote does not expose the requested module
    #[error("Remote '{remote}' does not expose '{module}'")]
    ModuleNotExposed {
        /// Remote name
        remote: String,
        /// Module key, e.g. `./App`
        module: String,
    },

    /// Manifest could not be parsed
    #[error("Invalid federation manifest: {0}")]
    InvalidManifest(String),
}

// ============================================================================
// Props
// ============================================================================

/// Callback a child invokes to notify its parent.
pub type Callback = Arc<dyn Fn(Value) + Send + Sync>;

/// Inputs a parent passes to a mounted component.
///
/// Values are plain JSON so any bundle can read them; callbacks are the only
/// way data flows back up.
#[derive(Clone, Default)]
pub struct Props {
    values: Map<String, Value>,
    callbacks: HashMap<String, Callback>,
}

impl Props {
    /// Empty props.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Add a callback.
    #[must_use]
    pub fn with_callback<F>(mut self, key: impl Into<String>, callback: F) -> Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        self.callbacks.insert(key.into(), Arc::new(callback));
        self
    }

    /// Raw value under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Value under `key` decoded as `T`; `None` if absent or of another shape.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Whether a callback named `key` was passed.
    #[must_use]
    pub fn has_callback(&self, key: &str) -> bool {
        self.callbacks.contains_key(key)
    }

    /// Invoke the callback named `key`. Returns false if there is none.
    pub fn emit(&self, key: &str, value: impl Into<Value>) -> bool {
        match self.callbacks.get(key) {
            Some(callback) => {
                callback(value.into());
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut callbacks: Vec<&String> = self.callbacks.keys().collect();
        callbacks.sort();
        f.debug_struct("Props")
            .field("values", &self.values)
            .field("callbacks", &callbacks)
            .finish()
    }
}

// ============================================================================
// Components
// ============================================================================

/// Everything a component receives when it is mounted.
#[derive(Debug, Clone)]
pub struct MountContext {
    /// Page the component lives on
    pub page: Page,
    /// Inputs from the parent
    pub props: Props,
}

impl MountContext {
    /// Build a context.
    #[must_use]
    pub const fn new(page: Page, props: Props) -> Self {
        Self { page, props }
    }
}

/// A federated UI unit.
///
/// Rendering is outside this workspace; a component here is the stateful
/// model behind a view, with a mount/unmount lifecycle.
pub trait Component: Send + Sync {
    /// Display name, e.g. `"Remote App 1 - Counter"`.
    fn name(&self) -> &str;

    /// Attach to a page. Mounting an already mounted component remounts it.
    fn mount(&mut self, ctx: MountContext);

    /// Detach and release page resources (listeners, subscriptions).
    fn unmount(&mut self);

    /// Whether the component is currently mounted.
    fn is_mounted(&self) -> bool;

    /// Work to run once mounted, such as the initial data fetch.
    fn after_mount(&self) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }

    /// Downcasting hook so a host (or a test) can reach the concrete model.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Mutable counterpart of [`as_any`](Self::as_any).
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Builds a fresh component instance.
pub type ComponentFactory = Arc<dyn Fn() -> Box<dyn Component> + Send + Sync>;

/// What a remote exposes: a name and its module factories.
#[derive(Clone)]
pub struct RemoteEntry {
    name: String,
    modules: BTreeMap<String, ComponentFactory>,
}

impl RemoteEntry {
    /// Entry with nothing exposed yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: BTreeMap::new(),
        }
    }

    /// Expose `module` (e.g. `./App`).
    #[must_use]
    pub fn expose<F>(mut self, module: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        self.modules.insert(module.into(), Arc::new(factory));
        self
    }

    /// Remote name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exposed module keys, sorted.
    #[must_use]
    pub fn exposed_modules(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    /// New instance of `module`, if exposed.
    #[must_use]
    pub fn instantiate(&self, module: &str) -> Option<Box<dyn Component>> {
        self.modules.get(module).map(|factory| factory())
    }
}

impl fmt::Debug for RemoteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteEntry")
            .field("name", &self.name)
            .field("modules", &self.exposed_modules())
            .finish()
    }
}

/// Parsed `remote/Module` specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpecifier {
    /// Remote name, e.g. `remote1`
    pub remote: String,
    /// Module key, e.g. `./App`
    pub module: String,
}

impl ComponentSpecifier {
    /// Parse `remote1/App` into `{ remote: "remote1", module: "./App" }`.
    ///
    /// # Errors
    ///
    /// Returns [`FederationError::InvalidSpecifier`] unless both halves are
    /// non-empty.
    pub fn parse(specifier: &str) -> Result<Self, FederationError> {
        match specifier.split_once('/') {
            Some((remote, module)) if !remote.is_empty() && !module.is_empty() => Ok(Self {
                remote: remote.to_string(),
                module: format!("./{}", module.trim_start_matches("./")),
            }),
            _ => Err(FederationError::InvalidSpecifier(specifier.to_string())),
        }
    }
}

// ============================================================================
// Manifest and loading
// ============================================================================

/// Remote name → entry URL, as configured in the host's build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FederationManifest {
    remotes: BTreeMap<String, String>,
}

impl FederationManifest {
    /// Empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a remote.
    #[must_use]
    pub fn with_remote(mut self, name: impl Into<String>, entry_url: impl Into<String>) -> Self {
        self.remotes.insert(name.into(), entry_url.into());
        self
    }

    /// Parse a JSON object of `name: url` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`FederationError::InvalidManifest`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, FederationError> {
        serde_json::from_str(json).map_err(|e| FederationError::InvalidManifest(e.to_string()))
    }

    /// Entry URL for `name`.
    #[must_use]
    pub fn entry_url(&self, name: &str) -> Option<&str> {
        self.remotes.get(name).map(String::as_str)
    }

    /// Configured remote names, sorted.
    #[must_use]
    pub fn remotes(&self) -> Vec<&str> {
        self.remotes.keys().map(String::as_str).collect()
    }
}

/// Fetches remote entries.
///
/// Returns boxed futures so hosts can hold `Arc<dyn RemoteLoader>`.
pub trait RemoteLoader: Send + Sync {
    /// Load the entry of `remote` published at `url`.
    fn load_entry<'a>(
        &'a self,
        remote: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, Result<RemoteEntry, FederationError>>;
}

/// Loader backed by entries registered in-process.
///
/// Remote bundles linked into the same binary register their entry here; the
/// URL from the manifest is only used for diagnostics.
#[derive(Default)]
pub struct StaticRemoteLoader {
    entries: RwLock<HashMap<String, RemoteEntry>>,
}

impl StaticRemoteLoader {
    /// Loader with no entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry under its own name.
    #[must_use]
    pub fn with_entry(self, entry: RemoteEntry) -> Self {
        self.register(entry);
        self
    }

    /// Register (or replace) an entry.
    pub fn register(&self, entry: RemoteEntry) {
        self.entries.write().insert(entry.name().to_string(), entry);
    }
}

impl RemoteLoader for StaticRemoteLoader {
    fn load_entry<'a>(
        &'a self,
        remote: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, Result<RemoteEntry, FederationError>> {
        Box::pin(async move {
            self.entries
                .read()
                .get(remote)
                .cloned()
                .ok_or_else(|| FederationError::EntryUnavailable {
                    remote: remote.to_string(),
                    url: url.to_string(),
                    reason: "no entry registered".to_string(),
                })
        })
    }
}

/// Resolves `remote/Module` specifiers to component instances.
pub struct ModuleFederation {
    manifest: FederationManifest,
    loader: Arc<dyn RemoteLoader>,
    entries: Mutex<HashMap<String, RemoteEntry>>,
}

impl ModuleFederation {
    /// Federation over `manifest`, fetching entries through `loader`.
    #[must_use]
    pub fn new(manifest: FederationManifest, loader: Arc<dyn RemoteLoader>) -> Self {
        Self {
            manifest,
            loader,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The manifest in use.
    #[must_use]
    pub const fn manifest(&self) -> &FederationManifest {
        &self.manifest
    }

    /// Load (or reuse) the entry of `remote`.
    ///
    /// # Errors
    ///
    /// Returns [`FederationError::UnknownRemote`] if the manifest does not list
    /// `remote`, or the loader's error.
    #[tracing::instrument(skip(self))]
    pub async fn load_entry(&self, remote: &str) -> Result<RemoteEntry, FederationError> {
        if let Some(entry) = self.entries.lock().get(remote) {
            return Ok(entry.clone());
        }

        let url = self
            .manifest
            .entry_url(remote)
            .ok_or_else(|| FederationError::UnknownRemote(remote.to_string()))?;

        tracing::info!(remote, url, "loading remote entry");
        let entry = self.loader.load_entry(remote, url).await?;

        let mut entries = self.entries.lock();
        Ok(entries.entry(remote.to_string()).or_insert(entry).clone())
    }

    /// Instantiate the component named by `specifier` (e.g. `remote1/App`).
    ///
    /// # Errors
    ///
    /// Returns [`FederationError::InvalidSpecifier`] for malformed input,
    /// [`FederationError::ModuleNotExposed`] if the remote does not expose the
    /// module, or any error from [`load_entry`](Self::load_entry).
    pub async fn load_component(
        &self,
        specifier: &str,
    ) -> Result<Box<dyn Component>, FederationError> {
        let ComponentSpecifier { remote, module } = ComponentSpecifier::parse(specifier)?;
        let entry = self.load_entry(&remote).await?;
        entry
            .instantiate(&module)
            .ok_or(FederationError::ModuleNotExposed { remote, module })
    }

    /// Remotes whose entries are already loaded, sorted.
    #[must_use]
    pub fn loaded_remotes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ModuleFederation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleFederation")
            .field("manifest", &self.manifest)
            .field("loaded", &self.loaded_remotes())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe {
        mounted: bool,
    }

    impl Component for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn mount(&mut self, ctx: MountContext) {
            ctx.props.emit("onMount", json!(true));
            self.mounted = true;
        }

        fn unmount(&mut self) {
            self.mounted = false;
        }

        fn is_mounted(&self) -> bool {
            self.mounted
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    fn probe_entry() -> RemoteEntry {
        RemoteEntry::new("remote1").expose("./App", || Box::new(Probe { mounted: false }))
    }

    fn federation(loader: StaticRemoteLoader) -> ModuleFederation {
        let manifest = FederationManifest::new()
            .with_remote("remote1", "http://localhost:3001/assets/remoteEntry.js");
        ModuleFederation::new(manifest, Arc::new(loader))
    }

    #[test]
    fn specifier_parsing() {
        let spec = ComponentSpecifier::parse("remote1/App").unwrap();
        assert_eq!(spec.remote, "remote1");
        assert_eq!(spec.module, "./App");
        assert!(ComponentSpecifier::parse("remote1").is_err());
        assert!(ComponentSpecifier::parse("/App").is_err());
    }

    #[test]
    fn manifest_from_json() {
        let manifest = FederationManifest::from_json(
            r#"{"remote2":"http://localhost:3002/assets/remoteEntry.js"}"#,
        )
        .unwrap();
        assert_eq!(
            manifest.entry_url("remote2"),
            Some("http://localhost:3002/assets/remoteEntry.js")
        );
        assert!(FederationManifest::from_json("[1,2]").is_err());
    }

    #[test]
    fn props_values_and_callbacks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let props = Props::new()
            .with_value("title", "Counter")
            .with_callback("onCountChange", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        assert_eq!(props.get::<String>("title").as_deref(), Some("Counter"));
        assert_eq!(props.get::<i64>("title"), None);
        assert!(props.emit("onCountChange", 3));
        assert!(!props.emit("missing", 3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn loads_and_mounts_component() {
        let federation = federation(StaticRemoteLoader::new().with_entry(probe_entry()));
        let mut component = federation.load_component("remote1/App").await.unwrap();

        let mounted = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&mounted);
        component.mount(MountContext::new(
            Page::new(),
            Props::new().with_callback("onMount", move |_| {
                flag.fetch_add(1, Ordering::SeqCst);
            }),
        ));

        assert!(component.is_mounted());
        assert_eq!(mounted.load(Ordering::SeqCst), 1);
        assert_eq!(federation.loaded_remotes(), vec!["remote1".to_string()]);
    }

    #[tokio::test]
    async fn unknown_remote_and_module() {
        let federation = federation(StaticRemoteLoader::new().with_entry(probe_entry()));

        assert_eq!(
            federation.load_component("remote9/App").await.err(),
            Some(FederationError::UnknownRemote("remote9".to_string()))
        );
        assert_eq!(
            federation.load_component("remote1/Widget").await.err(),
            Some(FederationError::ModuleNotExposed {
                remote: "remote1".to_string(),
                module: "./Widget".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn missing_entry_reports_url() {
        let federation = federation(StaticRemoteLoader::new());
        let err = federation.load_component("remote1/App").await.err().unwrap();
        assert!(matches!(err, FederationError::EntryUnavailable { ref url, .. }
            if url == "http://localhost:3001/assets/remoteEntry.js"));
    }
}
