//! Stored Entry Module
//!
//! A serialized value with its absolute expiry, as kept by the in-process
//! backend.

use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Entry ==
/// One value held by the memory backend.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// Serialized JSON text
    pub value: String,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates an entry expiring `ttl_seconds` from now.
    pub fn new(value: String, ttl_seconds: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            expires_at: now.saturating_add(ttl_seconds.saturating_mul(1000)),
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiry, so a
    /// fully elapsed TTL is never served.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_with_ttl_is_live() {
        let entry = StoredEntry::new("1".to_string(), 60);
        assert_eq!(entry.value, "1");
        assert!(!entry.is_expired());
        let remaining = entry.expires_at - current_timestamp_ms();
        assert!((59_000..=60_000).contains(&remaining));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoredEntry::new("1".to_string(), 1);
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = StoredEntry {
            value: "1".to_string(),
            expires_at: current_timestamp_ms(),
        };
        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
