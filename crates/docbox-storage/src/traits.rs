//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait the API handlers depend on.
//! Handlers receive an `Arc<dyn ObjectStorage>` constructed at startup, so
//! the backend can be swapped (or mocked in tests) without touching them.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage abstraction.
///
/// The bucket is part of the backend's construction-time configuration, not a
/// per-call argument. Keys follow the format described in the crate root
/// documentation.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write an object to durable storage under the given key.
    ///
    /// There is no retry; a transport, auth, or bucket failure surfaces as
    /// `UploadFailed`.
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// Mint a time-limited presigned GET URL for the given key.
    ///
    /// Returns `NotFound` when the key does not exist. Signing itself is a
    /// local operation, so a successful result means "URL was minted", not
    /// that the object is guaranteed to still exist at fetch time.
    async fn presign_download(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;
}
