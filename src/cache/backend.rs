//! Key-value backend trait
//!
//! Each concrete store implements `KvBackend` with its own call conventions.
//! `KvStore` is the only caller; nothing else branches on backend type.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

// == Payload ==
/// A value as read back from a backend.
///
/// Some stores hand back the raw serialized text, others hand back a value
/// their client has already decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Serialized JSON text, still to be parsed
    Raw(String),
    /// Already decoded JSON value
    Decoded(Value),
}

impl Payload {
    /// Turns the payload into a JSON value, parsing raw text when needed.
    pub fn into_value(self) -> StoreResult<Value> {
        match self {
            Payload::Raw(text) => serde_json::from_str(&text).map_err(StoreError::from),
            Payload::Decoded(value) => Ok(value),
        }
    }
}

// == KvBackend ==
/// Uniform operations over a concrete key-value store.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Reads a key. `None` when absent or expired.
    async fn get(&self, key: &str) -> StoreResult<Option<Payload>>;

    /// Writes serialized JSON under `key`, expiring after `ttl_secs`.
    async fn set_ex(&self, key: &str, ttl_secs: u64, value: String) -> StoreResult<()>;

    /// Removes keys. Absent keys are ignored.
    async fn del(&self, keys: &[String]) -> StoreResult<()>;

    /// Lists keys matching a Redis-style glob pattern.
    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Drops every key of the current database.
    async fn flush(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_payload_is_parsed() {
        let payload = Payload::Raw(r#"{"a":1}"#.to_string());
        assert_eq!(payload.into_value().unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_decoded_payload_passes_through() {
        let payload = Payload::Decoded(json!([1, 2, 3]));
        assert_eq!(payload.into_value().unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_corrupt_raw_payload_is_an_error() {
        let payload = Payload::Raw("{not json".to_string());
        assert!(matches!(
            payload.into_value(),
            Err(StoreError::Serialization(_))
        ));
    }
}
