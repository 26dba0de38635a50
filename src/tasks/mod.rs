//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweeper: drops expired entries from the in-process store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
