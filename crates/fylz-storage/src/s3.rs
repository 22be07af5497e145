use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use fylz_core::models::{Capability, ListingPage, ObjectSummary, StoredObject};
use std::time::Duration;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `max_attempts` - SDK attempts per call; 1 disables client-side retry
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        max_attempts: u32,
    ) -> StorageResult<Self> {
        if bucket.is_empty() {
            return Err(StorageError::ConfigError("S3 bucket name is empty".to_string()));
        }

        let region_provider =
            RegionProviderChain::first_try(aws_config::Region::new(region.clone()));

        let retry_config = RetryConfig::standard().with_max_attempts(max_attempts.max(1));

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(retry_config.clone())
            .load()
            .await;

        let client = if let Some(ref endpoint) = endpoint_url {
            // S3-compatible providers (MinIO, etc.) need path-style addressing
            let s3_config = aws_sdk_s3::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .retry_config(retry_config)
                .force_path_style(true)
                .build();
            Client::from_conf(s3_config)
        } else {
            Client::new(&config)
        };

        tracing::info!(
            bucket = %bucket,
            region = %region,
            endpoint = ?endpoint_url,
            max_attempts,
            "S3 storage initialized"
        );

        Ok(S3Storage { client, bucket })
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn list_objects(
        &self,
        prefix: Option<&str>,
        continuation_token: Option<&str>,
    ) -> StorageResult<ListingPage> {
        let start = std::time::Instant::now();

        let mut request = self.client.list_objects_v2().bucket(&self.bucket);
        if let Some(prefix) = prefix {
            request = request.prefix(prefix);
        }
        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let output = request.send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                prefix = ?prefix,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 list failed"
            );
            StorageError::ListFailed(e.to_string())
        })?;

        let entries: Vec<ObjectSummary> = output
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?;
                let size = object.size().unwrap_or(0).max(0) as u64;
                Some(ObjectSummary::new(key, size))
            })
            .collect();

        let next_token = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        tracing::debug!(
            bucket = %self.bucket,
            prefix = ?prefix,
            entries = entries.len(),
            truncated = next_token.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list successful"
        );

        Ok(ListingPage::from_parts(entries, next_token))
    }

    async fn get_object(&self, storage_key: &str) -> StorageResult<StoredObject> {
        let start = std::time::Instant::now();

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err)
                    if matches!(service_err.err(), GetObjectError::NoSuchKey(_)) =>
                {
                    StorageError::NotFound(storage_key.to_string())
                }
                _ => {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %storage_key,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 download failed"
                    );
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        let content_type = output
            .content_type()
            .filter(|ct| !ct.is_empty())
            .map(str::to_string);
        let content_length = output
            .content_length()
            .and_then(|len| u64::try_from(len).ok());

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes();

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(StoredObject {
            bytes,
            content_type,
            content_length,
        })
    }

    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        content_length: u64,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let length = i64::try_from(content_length)
            .map_err(|_| StorageError::UploadFailed("Content length out of range".to_string()))?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .body(ByteStream::from(data))
            .content_length(length);
        if !content_type.is_empty() {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = content_length,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = content_length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn presign(
        &self,
        storage_key: &str,
        capability: Capability,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let presigning_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        // The two request builders fail with different error types; flatten to text.
        let presigned_request = match capability {
            Capability::Read => self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(storage_key)
                .presigned(presigning_config)
                .await
                .map_err(|e| e.to_string()),
            Capability::Write => self
                .client
                .put_object()
                .bucket(&self.bucket)
                .key(storage_key)
                .presigned(presigning_config)
                .await
                .map_err(|e| e.to_string()),
        }
        .map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                capability = capability.as_str(),
                "S3 presign failed"
            );
            StorageError::PresignFailed(e)
        })?;

        Ok(presigned_request.uri().to_string())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
