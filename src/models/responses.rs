//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies. Listings and
//! records are returned as the garage models themselves.

use serde::Serialize;

use crate::cache::{CacheStats, StoreStatus};

/// Response body for cache statistics (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Adapter state
    pub status: StoreStatus,
    /// Active backend name
    pub backend: String,
    /// Counters since startup
    #[serde(flatten)]
    pub counters: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(status: StoreStatus, backend: impl Into<String>, counters: CacheStats) -> Self {
        Self {
            status,
            backend: backend.into(),
            hit_rate: counters.hit_rate(),
            counters,
        }
    }
}

/// Response body for DELETE /admin/cache
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub message: String,
}

impl FlushResponse {
    pub fn new() -> Self {
        Self {
            message: "Cache flushed".to_string(),
        }
    }
}

impl Default for FlushResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for entity deletions
#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub message: String,
    pub id: i32,
}

impl DeletedResponse {
    pub fn new(entity: &str, id: i32) -> Self {
        Self {
            message: format!("{entity} {id} deleted successfully"),
            id,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stats_response_flattens_counters() {
        let counters = CacheStats {
            hits: 80,
            misses: 20,
            writes: 20,
            deletes: 3,
            errors: 0,
        };
        let resp = StatsResponse::new(StoreStatus::Enabled, "memory", counters);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["status"], json!({"state": "enabled"}));
        assert_eq!(value["backend"], "memory");
        assert_eq!(value["hits"], 80);
        assert_eq!(value["deletes"], 3);
    }

    #[test]
    fn test_deleted_response() {
        let resp = DeletedResponse::new("customer", 4);
        assert_eq!(resp.message, "customer 4 deleted successfully");
        assert_eq!(resp.id, 4);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
