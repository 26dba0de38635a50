//! Garage Cache - read-through caching for the garage dashboard
//!
//! Wraps dashboard queries in a cache backed by Redis, a REST key-value
//! store, or process memory, with explicit invalidation on every write.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod garage;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, KvStore, StoreStatus, Ttl};
pub use config::{Config, StoreConfig};
pub use tasks::spawn_cleanup_task;
