//! Storage abstraction trait
//!
//! The proxy never reads object bytes through this trait. It only asks a
//! backend for a short-lived retrieval URL and fetches that URL itself, so
//! alternative object stores can be swapped in without touching the relay.

use crate::StorageBackend;
use async_trait::async_trait;
use http::Method;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Signing capability for a storage backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Produce a time-limited URL for `method` (GET or HEAD) on `storage_key`.
    ///
    /// The returned URL carries credentials and must never be sent to a client.
    async fn get_presigned_url(
        &self,
        method: &Method,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
