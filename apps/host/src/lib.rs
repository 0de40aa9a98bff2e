//! # Micro Frontend Host
//!
//! The shell application. It never calls into its remotes directly: remotes
//! are resolved by specifier (`remote1/App`, `remote2/App`) through
//! [`ModuleFederation`](mfe_runtime::ModuleFederation), mounted with props,
//! and observed through the shared store.
//!
//! ## Example
//!
//! ```no_run
//! use mfe_client::ApiClient;
//! use mfe_host::{HostApp, HostConfig, ViewMode, bundled_remotes};
//! use mfe_runtime::{ModuleFederation, Page};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HostConfig::from_env()?;
//! let client = ApiClient::new(&config.api_base)?;
//! let federation = ModuleFederation::new(config.remotes, Arc::new(bundled_remotes(client)));
//!
//! let mut host = HostApp::new(Page::global(), federation);
//! host.navigate(ViewMode::Both).await?;
//! host.login("ada")?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;

use mfe_client::ApiClient;
use mfe_runtime::StaticRemoteLoader;

// Re-export main types for convenience
pub use app::{HEADING, HOME_HINT, HostApp, HostError, REMOTE1_APP, REMOTE2_APP, ViewMode, WELCOME};
pub use config::{HostConfig, default_manifest};

/// Default `RUST_LOG` filter for the host binary.
pub const DEFAULT_LOG_FILTER: &str =
    "mfe_host=info,mfe_runtime=info,mfe_remote1=info,mfe_remote2=info";

/// Loader serving the remotes compiled into this workspace.
#[must_use]
pub fn bundled_remotes(client: ApiClient) -> StaticRemoteLoader {
    StaticRemoteLoader::new()
        .with_entry(mfe_remote1::remote_entry())
        .with_entry(mfe_remote2::remote_entry(client))
}
