//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use fylz_core::models::{Capability, ListingPage, StoredObject};
use fylz_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("File not found: {0}")]
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

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            StorageError::PresignFailed(msg) => AppError::Signing(msg),
            StorageError::ListFailed(msg)
            | StorageError::UploadFailed(msg)
            | StorageError::DownloadFailed(msg)
            | StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Storage abstraction trait
///
/// Every call is a single remote round trip. Backends do not retry; a failure
/// is surfaced to the caller immediately.
#[async_trait]
pub trait Storage: Send + Sync {
    /// List one page of objects, optionally restricted to keys starting with
    /// `prefix` and resumed from `continuation_token`.
    ///
    /// Entries come back in the store's listing order (lexicographic by key
    /// for S3-compatible stores).
    async fn list_objects(
        &self,
        prefix: Option<&str>,
        continuation_token: Option<&str>,
    ) -> StorageResult<ListingPage>;

    /// Fetch an object's bytes together with its recorded metadata
    async fn get_object(&self, storage_key: &str) -> StorageResult<StoredObject>;

    /// Write `data` under `storage_key`
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        content_length: u64,
    ) -> StorageResult<()>;

    /// Generate a presigned URL granting `capability` on `storage_key`
    ///
    /// Pure computation over the store's signing primitive; nothing is
    /// created or mutated in the store.
    async fn presign(
        &self,
        storage_key: &str,
        capability: Capability,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Bucket this backend reads from and writes to
    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_not_found_maps_to_not_found() {
        let app: AppError = StorageError::NotFound("a/b".to_string()).into();
        assert!(matches!(app, AppError::NotFound(msg) if msg == "a/b"));
    }

    #[test]
    fn test_storage_error_presign_maps_to_signing() {
        let app: AppError = StorageError::PresignFailed("expired creds".to_string()).into();
        assert!(matches!(app, AppError::Signing(_)));
    }

    #[test]
    fn test_storage_error_transport_maps_to_storage() {
        let app: AppError = StorageError::ListFailed("timeout".to_string()).into();
        assert!(matches!(app, AppError::Storage(_)));
        let app: AppError = StorageError::UploadFailed("denied".to_string()).into();
        assert!(matches!(app, AppError::Storage(_)));
    }
}
