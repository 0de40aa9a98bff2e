//! Host configuration: where the API lives and where each remote entry is
//! served from.

use mfe_client::DEFAULT_API_BASE;
use mfe_runtime::{FederationError, FederationManifest};
use std::env;

/// Entry URL of the counter remote in local development.
pub const DEFAULT_REMOTE1_ENTRY: &str = "http://localhost:3001/assets/remoteEntry.js";

/// Entry URL of the todo-list remote in local development.
pub const DEFAULT_REMOTE2_ENTRY: &str = "http://localhost:3002/assets/remoteEntry.js";

/// Host configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Base URL of the REST API
    pub api_base: String,
    /// Remote name → entry URL
    pub remotes: FederationManifest,
}

/// Manifest used when `MFE_REMOTES` is unset.
#[must_use]
pub fn default_manifest() -> FederationManifest {
    FederationManifest::new()
        .with_remote(mfe_remote1::REMOTE_NAME, DEFAULT_REMOTE1_ENTRY)
        .with_remote(mfe_remote2::REMOTE_NAME, DEFAULT_REMOTE2_ENTRY)
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            remotes: default_manifest(),
        }
    }
}

impl HostConfig {
    /// Load from `MFE_API_BASE` and `MFE_REMOTES`.
    ///
    /// # Errors
    ///
    /// Returns [`FederationError::InvalidManifest`] if `MFE_REMOTES` is not a
    /// JSON object of strings.
    pub fn from_env() -> Result<Self, FederationError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load through `lookup` (variable name → value).
    ///
    /// # Errors
    ///
    /// Returns [`FederationError::InvalidManifest`] if `MFE_REMOTES` is not a
    /// JSON object of strings.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FederationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup("MFE_API_BASE") {
            config.api_base = base;
        }

        if let Some(json) = lookup("MFE_REMOTES") {
            config.remotes = FederationManifest::from_json(&json)?;
        }

        Ok(config)
    }
}
