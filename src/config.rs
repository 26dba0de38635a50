//! Configuration Module
//!
//! Handles loading server and key-value store configuration from environment
//! variables. Store selection happens once, at startup.

use std::env;
use std::time::Duration;

use tracing::warn;

// == Store Config ==
/// Which backing store the cache talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Network Redis reached through a persistent client (`redis://`, `rediss://`)
    Local { url: String },
    /// REST key-value store addressed by URL and bearer token
    Rest { url: String, token: String },
    /// In-process store (`memory://`), single instance only
    Memory,
    /// No store configured; every cache operation is a no-op
    Disabled,
}

impl StoreConfig {
    /// Picks a backend from the raw variable values.
    ///
    /// A Redis URL wins over REST credentials. Empty values count as unset.
    pub fn select(
        redis_url: Option<&str>,
        rest_url: Option<&str>,
        rest_token: Option<&str>,
    ) -> Self {
        let redis_url = redis_url.filter(|v| !v.is_empty());
        let rest_url = rest_url.filter(|v| !v.is_empty());
        let rest_token = rest_token.filter(|v| !v.is_empty());

        if let Some(url) = redis_url {
            if url.starts_with("redis://") || url.starts_with("rediss://") {
                return StoreConfig::Local {
                    url: url.to_string(),
                };
            }
            if url.starts_with("memory://") {
                return StoreConfig::Memory;
            }
        }

        match (rest_url, rest_token) {
            (Some(url), Some(token)) => StoreConfig::Rest {
                url: url.trim_end_matches('/').to_string(),
                token: token.to_string(),
            },
            _ => {
                if let Some(url) = redis_url {
                    warn!(url, "REDIS_URL has an unsupported scheme, cache disabled");
                }
                StoreConfig::Disabled
            }
        }
    }

    /// Short name used in logs and the stats endpoint.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreConfig::Local { .. } => "redis",
            StoreConfig::Rest { .. } => "rest",
            StoreConfig::Memory => "memory",
            StoreConfig::Disabled => "disabled",
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected key-value backend
    pub store: StoreConfig,
    /// True when store variables are present, whether or not they are usable
    pub store_configured: bool,
    /// Timeout for a single store round trip, in milliseconds
    pub store_timeout_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Memory backend sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - `redis://`, `rediss://` or `memory://` store URL
    /// - `UPSTASH_REDIS_REST_URL` - REST store base URL
    /// - `UPSTASH_REDIS_REST_TOKEN` - REST store bearer token
    /// - `STORE_TIMEOUT_MS` - Store round trip timeout (default: 2000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Memory store sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let redis_url = set("REDIS_URL");
        let rest_url = set("UPSTASH_REDIS_REST_URL");
        let rest_token = set("UPSTASH_REDIS_REST_TOKEN");

        let store_configured =
            redis_url.is_some() || (rest_url.is_some() && rest_token.is_some());

        let defaults = Self::default();
        Self {
            store: StoreConfig::select(
                redis_url.as_deref(),
                rest_url.as_deref(),
                rest_token.as_deref(),
            ),
            store_configured,
            store_timeout_ms: lookup("STORE_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store_timeout_ms),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: lookup("CLEANUP_INTERVAL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Store round trip timeout as a Duration.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::Disabled,
            store_configured: false,
            store_timeout_ms: 2000,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
