//! Memory backend
//!
//! In-process key-value store with per-entry expiry. Expired entries are
//! dropped lazily on read and in bulk by the background sweeper. Values are
//! kept as JSON text and read back raw, like the Redis backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::backend::{KvBackend, Payload};
use crate::cache::entry::StoredEntry;
use crate::cache::glob::glob_match;
use crate::error::StoreResult;

// == Memory Backend ==
/// Shared in-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, StoredEntry>>>,
}

impl MemoryBackend {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Payload>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => {
                    return Ok(Some(Payload::Raw(entry.value.clone())))
                }
                Some(_) => {}
            }
        }

        // Expired: drop it unless a writer refreshed it in the meantime
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired()) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: String) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry::new(value, ttl_secs));
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired() && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn flush(&self) -> StoreResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryBackend::new();
        assert_eq!(store.get("missing_key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_get_raw() {
        let store = MemoryBackend::new();
        store.set_ex("k", 60, r#"{"a":1}"#.to_string()).await.unwrap();

        let payload = store.get("k").await.unwrap();
        assert_eq!(payload, Some(Payload::Raw(r#"{"a":1}"#.to_string())));
    }

    #[tokio::test]
    async fn test_overwrite_resets_value() {
        let store = MemoryBackend::new();
        store.set_ex("k", 60, "1".to_string()).await.unwrap();
        store.set_ex("k", 60, "2".to_string()).await.unwrap();

        assert_eq!(
            store.get("k").await.unwrap(),
            Some(Payload::Raw("2".to_string()))
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_natural_expiry() {
        let store = MemoryBackend::new();
        store.set_ex("k", 1, "1".to_string()).await.unwrap();
        assert!(store.get("k").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty().await, "Expired entry is dropped on read");
    }

    #[tokio::test]
    async fn test_del_ignores_absent_keys() {
        let store = MemoryBackend::new();
        store.set_ex("a", 60, "1".to_string()).await.unwrap();

        store
            .del(&["a".to_string(), "nope".to_string()])
            .await
            .unwrap();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_keys_by_pattern() {
        let store = MemoryBackend::new();
        for key in [
            "customers:5:1:10",
            "customers:5:2:10",
            "customers:6:1:10",
            "customers_count:5",
        ] {
            store.set_ex(key, 60, "0".to_string()).await.unwrap();
        }

        let mut keys = store.keys("customers:5:*:*").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["customers:5:1:10", "customers:5:2:10"]);
    }

    #[tokio::test]
    async fn test_flush_clears_everything() {
        let store = MemoryBackend::new();
        store.set_ex("a", 60, "1".to_string()).await.unwrap();
        store.set_ex("b", 60, "2".to_string()).await.unwrap();

        store.flush().await.unwrap();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = MemoryBackend::new();
        store.set_ex("short", 1, "1".to_string()).await.unwrap();
        store.set_ex("long", 10, "2".to_string()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.cleanup_expired().await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("long").await.unwrap().is_some());
    }
}
