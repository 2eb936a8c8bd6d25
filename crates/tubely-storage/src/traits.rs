//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use thiserror::Error;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
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

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Implementations must make an object visible under its key only once it has
/// been completely written, so a returned URL always refers to a whole object.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a file from the local filesystem and return its public URL.
    ///
    /// Large files are streamed from disk rather than loaded into memory.
    async fn upload_file(&self, key: &str, path: &Path, content_type: &str)
        -> StorageResult<String>;

    /// Upload an in-memory object and return its public URL
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<String>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Public URL an object with this key is served from
    fn public_url(&self, key: &str) -> String;

    fn backend_type(&self) -> StorageBackend;
}
