//! # Micro Frontend Runtime
//!
//! Page-level machinery shared by every independently built application that
//! is loaded into the same page.
//!
//! ## Core Components
//!
//! - **Page**: the execution context all bundles share. It owns the global
//!   registry (well-known slots looked up by key) and the page event bus.
//! - **SharedStore**: the single observable state cell published under
//!   [`GLOBAL_STORE_KEY`]. Whichever bundle initializes first creates it; every
//!   later bundle discovers the same instance.
//! - **Module federation**: resolves `remote/Module` specifiers to component
//!   instances through a manifest and a loader.
//!
//! ## Example
//!
//! ```
//! use mfe_core::types::Origin;
//! use mfe_runtime::{Page, SharedStore};
//!
//! let page = Page::new();
//!
//! // Two bundles initializing independently
//! let host_store = SharedStore::get_or_create(&page);
//! let remote_store = SharedStore::get_or_create(&page);
//! assert!(host_store.ptr_eq(&remote_store));
//!
//! remote_store.add_message("hello from remote1", Origin::Remote1);
//! assert_eq!(host_store.snapshot().messages.len(), 1);
//! ```

pub mod events;
pub mod federation;
pub mod ids;
pub mod page;
pub mod registry;
pub mod store;

// Re-export key types for convenience
pub use events::{EventListener, PageEventBus};
pub use federation::{
    Callback, Component, ComponentFactory, ComponentSpecifier, FederationError, FederationManifest,
    ModuleFederation, MountContext, Props, RemoteEntry, RemoteLoader, StaticRemoteLoader,
};
pub use ids::TimeOrderedIds;
pub use page::Page;
pub use registry::GlobalRegistry;
pub use store::{GLOBAL_STORE_KEY, SharedState, SharedStore, StoreMessage, Subscription};
