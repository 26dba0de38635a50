//! Key-Value Store Adapter
//!
//! One interface over whichever backend was selected at startup. Every
//! operation absorbs backend failures: reads report a miss, writes and deletes
//! are skipped, and the failure is logged and counted.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::backend::KvBackend;
use crate::cache::memory_store::MemoryBackend;
use crate::cache::redis_store::RedisBackend;
use crate::cache::rest_store::RestBackend;
use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Upper bound on a single backend round trip when none is configured.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

// == Store Status ==
/// Whether the adapter can reach a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum StoreStatus {
    /// Backend constructed and in use
    Enabled,
    /// No store configured
    Disabled,
    /// Store configured but could not be constructed
    Error(String),
}

// == Kv Store ==
/// Adapter over an optional backend.
pub struct KvStore {
    backend: Option<Arc<dyn KvBackend>>,
    status: StoreStatus,
    timeout: Duration,
    stats: StatsRecorder,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("backend", &self.backend_name())
            .field("status", &self.status)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl KvStore {
    // == Constructors ==
    /// Adapter with no backend. Every operation is a no-op.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            status: StoreStatus::Disabled,
            timeout: DEFAULT_OPERATION_TIMEOUT,
            stats: StatsRecorder::new(),
        }
    }

    /// Adapter whose backend failed to construct.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: StoreStatus::Error(reason.into()),
            ..Self::disabled()
        }
    }

    /// Adapter over a ready backend.
    pub fn with_backend(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend: Some(backend),
            status: StoreStatus::Enabled,
            ..Self::disabled()
        }
    }

    /// Sets the per-operation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the adapter for the configured backend.
    ///
    /// Never fails: construction errors leave the adapter in the
    /// `Error` state and are logged.
    pub async fn open(config: &StoreConfig, timeout: Duration) -> Self {
        let backend: StoreResult<Arc<dyn KvBackend>> = match config {
            StoreConfig::Disabled => {
                info!("No cache store configured, caching disabled");
                return Self::disabled().with_timeout(timeout);
            }
            StoreConfig::Local { url } => RedisBackend::connect(url, timeout)
                .await
                .map(|b| Arc::new(b) as Arc<dyn KvBackend>),
            StoreConfig::Rest { url, token } => {
                RestBackend::new(url, token, timeout).map(|b| Arc::new(b) as Arc<dyn KvBackend>)
            }
            StoreConfig::Memory => Ok(Arc::new(MemoryBackend::new()) as Arc<dyn KvBackend>),
        };

        match backend {
            Ok(backend) => {
                info!(backend = backend.name(), "Cache store enabled");
                Self::with_backend(backend).with_timeout(timeout)
            }
            Err(err) => {
                warn!(
                    backend = config.kind(),
                    error = %err,
                    "Cache store unavailable, caching disabled"
                );
                Self::failed(err.to_string()).with_timeout(timeout)
            }
        }
    }

    // == Status ==
    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    /// True when a backend is in use.
    pub fn is_configured(&self) -> bool {
        self.status == StoreStatus::Enabled
    }

    /// Name of the active backend, `"none"` when there is none.
    pub fn backend_name(&self) -> &'static str {
        self.backend.as_ref().map_or("none", |b| b.name())
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Get ==
    /// Reads and decodes a value.
    ///
    /// Absent, expired, undecodable and unreachable all read as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let Some(backend) = &self.backend else {
            self.stats.record_miss();
            return None;
        };

        let payload = match self.run("get", key, backend.get(key)).await {
            Some(Some(payload)) => payload,
            _ => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                return None;
            }
        };

        let decoded = payload
            .into_value()
            .and_then(|value| serde_json::from_value(value).map_err(StoreError::from));
        match decoded {
            Ok(value) => {
                self.stats.record_hit();
                debug!(key, "cache hit");
                Some(value)
            }
            Err(err) => {
                self.stats.record_miss();
                warn!(key, error = %err, "Discarding undecodable cached value");
                None
            }
        }
    }

    // == Set With Expiry ==
    /// Serializes and stores a value that the backend expires after
    /// `ttl_secs` seconds.
    ///
    /// A zero TTL stores nothing.
    pub async fn set_with_expiry<T>(&self, key: &str, ttl_secs: u64, value: &T)
    where
        T: Serialize + ?Sized,
    {
        let Some(backend) = &self.backend else {
            return;
        };

        if ttl_secs == 0 {
            debug!(key, "zero TTL, value not cached");
            return;
        }

        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(err) => {
                self.stats.record_error();
                warn!(key, error = %err, "Value could not be serialized for caching");
                return;
            }
        };

        if self
            .run("set", key, backend.set_ex(key, ttl_secs, text))
            .await
            .is_some()
        {
            self.stats.record_write();
            debug!(key, ttl_secs, "cache set");
        }
    }

    // == Delete ==
    /// Removes keys. Absent keys are ignored.
    pub async fn delete(&self, keys: &[String]) {
        let Some(backend) = &self.backend else {
            return;
        };
        if keys.is_empty() {
            return;
        }

        let label = keys.join(",");
        if self.run("del", &label, backend.del(keys)).await.is_some() {
            self.stats.record_deletes(keys.len() as u64);
        }
    }

    // == List Keys ==
    /// Keys matching a glob pattern; empty when the store is unavailable.
    pub async fn list_keys(&self, pattern: &str) -> Vec<String> {
        let Some(backend) = &self.backend else {
            return Vec::new();
        };
        self.run("keys", pattern, backend.keys(pattern))
            .await
            .unwrap_or_default()
    }

    // == Flush All ==
    /// Drops every cached entry. Administrative use only.
    pub async fn flush_all(&self) {
        let Some(backend) = &self.backend else {
            return;
        };
        if self.run("flush", "*", backend.flush()).await.is_some() {
            info!(backend = backend.name(), "Cache store flushed");
        }
    }

    /// Runs one backend call under the timeout, absorbing any failure.
    async fn run<T, F>(&self, op: &'static str, key: &str, call: F) -> Option<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                self.stats.record_error();
                warn!(
                    op,
                    key,
                    backend = self.backend_name(),
                    error = %err,
                    "Cache store operation failed"
                );
                None
            }
            Err(_) => {
                self.stats.record_error();
                warn!(
                    op,
                    key,
                    backend = self.backend_name(),
                    timeout = ?self.timeout,
                    "Cache store operation timed out"
                );
                None
            }
        }
    }
}
