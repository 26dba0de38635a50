//! Garage Module
//!
//! The dashboard's data access: domain records, the persistence interface,
//! and the service that wraps every query in the cache.

pub mod models;
pub mod repository;
pub mod service;

pub use repository::{GarageRepository, MemoryRepository, RepoResult};
pub use service::{GarageService, PageRequest};
