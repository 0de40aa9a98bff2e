//! Configuration for the API server.
//!
//! Loads configuration from environment variables with defaults matching the
//! local development setup (API on port 3003, host and remotes on 3000-3002).

use axum::http::HeaderValue;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Default SQLite location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/local.db";

/// Origins allowed by CORS when `MFE_CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:3002",
];

/// Invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to something unusable
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind to
    pub host: IpAddr,
    /// Port to bind to
    pub port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// Origins allowed by CORS
    pub cors_origins: Vec<HeaderValue>,
    /// Port of the Prometheus exporter; disabled when `None`
    pub metrics_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3003,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            cors_origins: DEFAULT_CORS_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through `lookup` (variable name → value).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("MFE_HOST") {
            config.host = host
                .parse()
                .map_err(|e| ConfigError::invalid("MFE_HOST", &host, e))?;
        }

        if let Some(port) = lookup("MFE_PORT") {
            config.port = parse_port("MFE_PORT", &port)?;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            if url.trim().is_empty() {
                return Err(ConfigError::invalid("DATABASE_URL", &url, "must not be empty"));
            }
            config.database_url = url;
        }

        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = match max.parse::<u32>() {
                Ok(0) => {
                    return Err(ConfigError::invalid(
                        "DATABASE_MAX_CONNECTIONS",
                        &max,
                        "must be at least 1",
                    ));
                }
                Ok(n) => n,
                Err(e) => return Err(ConfigError::invalid("DATABASE_MAX_CONNECTIONS", &max, e)),
            };
        }

        if let Some(origins) = lookup("MFE_CORS_ORIGINS") {
            config.cors_origins = parse_origins(&origins)?;
        }

        if let Some(port) = lookup("MFE_METRICS_PORT") {
            config.metrics_port = Some(parse_port("MFE_METRICS_PORT", &port)?);
        }

        Ok(config)
    }

    /// Socket address the API listens on.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Socket address of the Prometheus exporter, if enabled.
    #[must_use]
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.metrics_port.map(|port| SocketAddr::new(self.host, port))
    }
}

fn parse_port(var: &'static str, value: &str) -> Result<u16, ConfigError> {
    match value.parse::<u16>() {
        Ok(0) => Err(ConfigError::invalid(var, value, "port must be non-zero")),
        Ok(port) => Ok(port),
        Err(e) => Err(ConfigError::invalid(var, value, e)),
    }
}

fn parse_origins(value: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    let origins = value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| ConfigError::invalid("MFE_CORS_ORIGINS", value, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(ConfigError::invalid(
            "MFE_CORS_ORIGINS",
            value,
            "at least one origin is required",
        ));
    }
    Ok(origins)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3003");
        assert_eq!(config.database_url, "sqlite://./data/local.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.cors_origins.len(), 3);
        assert_eq!(config.metrics_addr(), None);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("MFE_HOST", "127.0.0.1"),
            ("MFE_PORT", "8080"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("MFE_CORS_ORIGINS", "http://example.test, http://other.test"),
            ("MFE_METRICS_PORT", "9000"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.cors_origins[1], "http://other.test");
        assert_eq!(config.metrics_addr().unwrap().port(), 9000);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(load(&[("MFE_PORT", "0")]).is_err());
        assert!(load(&[("MFE_PORT", "http")]).is_err());
        assert!(load(&[("MFE_HOST", "localhost:3003")]).is_err());
        assert!(load(&[("DATABASE_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("MFE_CORS_ORIGINS", " , ")]).is_err());
    }
}
