//! Cache Module
//!
//! Read-through caching over a pluggable key-value store: backends, the
//! store adapter, the facade with its invalidation helpers, and the key
//! registry.

mod backend;
mod entry;
mod facade;
mod glob;
pub mod keys;
mod memory_store;
mod redis_store;
mod rest_store;
mod stats;
mod store;
mod ttl;


// Re-export public types
pub use backend::{KvBackend, Payload};
pub use entry::StoredEntry;
pub use facade::Cache;
pub use glob::glob_match;
pub use memory_store::MemoryBackend;
pub use redis_store::RedisBackend;
pub use rest_store::RestBackend;
pub use stats::{CacheStats, StatsRecorder};
pub use store::{KvStore, StoreStatus, DEFAULT_OPERATION_TIMEOUT};
pub use ttl::Ttl;
