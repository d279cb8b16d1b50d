//! Blob store abstraction trait
//!
//! This module defines the `Storage` trait that all blob store backends
//! must implement.

use async_trait::async_trait;
use pixlift_core::{AppError, StorageBackend};
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) => AppError::BlobWriteFailed(msg),
            StorageError::NotFound(key) => AppError::NotFound(format!("Blob not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::InvalidArgument(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob store abstraction trait
///
/// All blob store backends (S3-compatible, local filesystem) must implement
/// this trait. The library layer works against `Arc<dyn Storage>` and never
/// touches backend specifics.
///
/// **Key format:** keys are owner-scoped and generated once per save by
/// `keys::generate_storage_key`; see the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` with the given content type. Overwrites are
    /// not expected: keys are unique per save.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Delete a blob by key. Deleting a key that no longer exists is Ok so
    /// deletes stay idempotent.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Delete several blobs, tolerating per-key failures. Returns the keys
    /// that could not be deleted together with their errors; the call itself
    /// only fails if the backend is unreachable outright.
    async fn delete_many(&self, keys: &[String]) -> Vec<(String, StorageError)> {
        let mut failures = Vec::new();
        for key in keys {
            if let Err(err) = self.delete(key).await {
                failures.push((key.clone(), err));
            }
        }
        failures
    }

    /// Generate a temporary read URL for one blob.
    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
