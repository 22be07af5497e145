//! In-memory storage backend.
//!
//! Keeps objects in a sorted map so listings come back in the same
//! lexicographic order an S3-compatible store uses. Paging, continuation
//! tokens and presigned URLs are emulated; the URLs are not fetchable.
//! Useful for tests and for running the gateway locally without a bucket.

use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use fylz_core::models::{Capability, ListingPage, ObjectSummary, StoredObject};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Page size used by S3's ListObjectsV2.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
struct MemoryObject {
    data: Bytes,
    content_type: Option<String>,
    content_length: Option<u64>,
}

/// In-memory storage implementation
#[derive(Clone)]
pub struct MemoryStorage {
    bucket: String,
    page_size: usize,
    objects: Arc<RwLock<BTreeMap<String, MemoryObject>>>,
    failing: Arc<AtomicBool>,
    /// Writes left before puts start failing; `usize::MAX` means unlimited.
    puts_remaining: Arc<AtomicUsize>,
}

impl MemoryStorage {
    /// Create an empty store for `bucket` with the default page size
    pub fn new(bucket: impl Into<String>) -> Self {
        Self::with_page_size(bucket, DEFAULT_PAGE_SIZE)
    }

    /// Create an empty store that returns at most `page_size` entries per listing page
    pub fn with_page_size(bucket: impl Into<String>, page_size: usize) -> Self {
        MemoryStorage {
            bucket: bucket.into(),
            page_size: page_size.max(1),
            objects: Arc::new(RwLock::new(BTreeMap::new())),
            failing: Arc::new(AtomicBool::new(false)),
            puts_remaining: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }

    /// Make every subsequent call fail as if the remote store were unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Let the next `successful` puts through, then fail every later one.
    pub fn fail_puts_after(&self, successful: usize) {
        self.puts_remaining.store(successful, Ordering::SeqCst);
    }

    fn take_put_slot(&self) -> StorageResult<()> {
        self.puts_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                if remaining == usize::MAX {
                    Some(remaining)
                } else {
                    remaining.checked_sub(1)
                }
            })
            .map(|_| ())
            .map_err(|_| {
                StorageError::UploadFailed("memory store write budget exhausted".to_string())
            })
    }

    /// Insert an object directly, bypassing length checks, with no recorded
    /// content type or length.
    pub async fn insert_raw(&self, storage_key: &str, data: impl Into<Bytes>) {
        self.objects.write().await.insert(
            storage_key.to_string(),
            MemoryObject {
                data: data.into(),
                content_type: None,
                content_length: None,
            },
        );
    }

    /// Number of objects currently stored
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    fn check_available(&self, operation: &str) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError(format!(
                "memory store unavailable during {}",
                operation
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list_objects(
        &self,
        prefix: Option<&str>,
        continuation_token: Option<&str>,
    ) -> StorageResult<ListingPage> {
        self.check_available("list")
            .map_err(|e| StorageError::ListFailed(e.to_string()))?;

        let objects = self.objects.read().await;
        let lower = match continuation_token {
            // The token is the last key of the previous page.
            Some(token) => Bound::Excluded(token.to_string()),
            None => Bound::Unbounded,
        };
        let prefix = prefix.unwrap_or("");

        let mut matching = objects
            .range((lower, Bound::Unbounded))
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectSummary::new(key.clone(), object.data.len() as u64));

        let entries: Vec<ObjectSummary> = matching.by_ref().take(self.page_size).collect();
        let has_more = matching.next().is_some();

        let next_token = if has_more {
            entries.last().map(|entry| entry.key.clone())
        } else {
            None
        };
        let page = ListingPage::from_parts(entries, next_token);

        tracing::debug!(
            bucket = %self.bucket,
            prefix = %prefix,
            entries = page.entries.len(),
            truncated = page.is_truncated(),
            "Memory list successful"
        );

        Ok(page)
    }

    async fn get_object(&self, storage_key: &str) -> StorageResult<StoredObject> {
        self.check_available("get")
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        let objects = self.objects.read().await;
        let object = objects
            .get(storage_key)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))?;

        Ok(StoredObject {
            bytes: object.data.clone(),
            content_type: object.content_type.clone(),
            content_length: object.content_length,
        })
    }

    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        content_length: u64,
    ) -> StorageResult<()> {
        self.check_available("put")
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        if storage_key.is_empty() || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }
        // S3 rejects a body whose size disagrees with the declared length.
        if content_length != data.len() as u64 {
            return Err(StorageError::UploadFailed(format!(
                "declared content length {} does not match payload of {} bytes",
                content_length,
                data.len()
            )));
        }

        self.take_put_slot()?;

        let size = data.len();
        self.objects.write().await.insert(
            storage_key.to_string(),
            MemoryObject {
                data,
                content_type: Some(content_type.to_string()).filter(|ct| !ct.is_empty()),
                content_length: Some(content_length),
            },
        );

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            "Memory upload successful"
        );

        Ok(())
    }

    async fn presign(
        &self,
        storage_key: &str,
        capability: Capability,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.check_available("presign")
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        Ok(format!(
            "memory://{}/{}?X-Fylz-Capability={}&X-Fylz-Expires={}",
            self.bucket,
            storage_key,
            capability.as_str(),
            expires_in.as_secs()
        ))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
