//! Error types for the cache layer and the HTTP surface
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failures raised by a key-value backend.
///
/// These never leave the cache layer: `KvStore` logs them and degrades to a
/// safe default.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Local Redis client failure
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Transport failure talking to the REST store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// REST store answered with an error payload or status
    #[error("REST store error ({status}): {message}")]
    Rest { status: u16, message: String },

    /// Value could not be encoded or decoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or malformed store configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type for backend operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Repository Error Enum ==
/// Failures of the persistence layer behind the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Referenced row does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Query could not be executed
    #[error("Query failed: {0}")]
    Query(String),
}

// == API Error Enum ==
/// Unified error type for the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Data source failure
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Repository(other),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Repository(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
