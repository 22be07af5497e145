//! Ingestion and retrieval orchestration.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use bytes::Bytes;
use fylz_core::keys::validate_filename;
use fylz_core::models::SignedUrl;
use fylz_core::sniff::sniff_content_type;
use fylz_core::{AppError, Identifier, StorageKey};
use fylz_storage::Storage;

use crate::resolver::KeyResolver;
use crate::signing::{SignedAccessIssuer, TtlPolicy};

/// One decoded part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// An object fetched for proxied delivery.
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub content_type: String,
    pub content_length: u64,
    pub bytes: Bytes,
}

/// Front door for storing and retrieving files by identifier.
#[derive(Clone)]
pub struct TransferGateway {
    storage: Arc<dyn Storage>,
    resolver: KeyResolver,
    issuer: SignedAccessIssuer,
}

impl TransferGateway {
    pub fn new(storage: Arc<dyn Storage>, policy: TtlPolicy) -> Self {
        let resolver = KeyResolver::new(storage.clone());
        let issuer = SignedAccessIssuer::new(storage.clone(), resolver.clone(), policy);
        Self {
            storage,
            resolver,
            issuer,
        }
    }

    pub fn issuer(&self) -> &SignedAccessIssuer {
        &self.issuer
    }

    /// Store `payload` under a freshly minted identifier.
    ///
    /// The written length is `declared_length` when it parses as an integer,
    /// otherwise the payload's actual size.
    #[tracing::instrument(skip(self, payload), fields(size_bytes = payload.len()))]
    pub async fn put(
        &self,
        filename: &str,
        payload: Bytes,
        content_type: Option<&str>,
        declared_length: Option<&str>,
    ) -> Result<Identifier, AppError> {
        let filename = validate_filename(filename)?;
        self.write(filename, payload, content_type, declared_length)
            .await
    }

    /// Store every part under its own identifier.
    ///
    /// All filenames are checked before anything is written, and the first
    /// failing write aborts the remaining parts. There is no partial-success
    /// report.
    #[tracing::instrument(skip_all, fields(parts = parts.len()))]
    pub async fn put_many(
        &self,
        parts: Vec<UploadPart>,
    ) -> Result<BTreeMap<String, Identifier>, AppError> {
        if parts.is_empty() {
            return Err(AppError::BadRequest(
                "Multipart body contains no files".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for part in &parts {
            validate_filename(&part.filename)?;
            if !seen.insert(part.filename.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Duplicate filename in multipart body: {}",
                    part.filename
                )));
            }
        }

        let mut ids = BTreeMap::new();
        for part in parts {
            let id = self
                .write(&part.filename, part.data, part.content_type.as_deref(), None)
                .await?;
            ids.insert(part.filename, id);
        }
        Ok(ids)
    }

    async fn write(
        &self,
        filename: &str,
        payload: Bytes,
        content_type: Option<&str>,
        declared_length: Option<&str>,
    ) -> Result<Identifier, AppError> {
        let id = Identifier::generate();
        let key = StorageKey::new(&id, filename);
        let content_length = declared_length
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(payload.len() as u64);

        self.storage
            .put_object(
                key.as_str(),
                payload,
                content_type.unwrap_or_default(),
                content_length,
            )
            .await?;

        tracing::info!(id = %id, key = %key, size_bytes = content_length, "File stored");
        Ok(id)
    }

    /// Resolve `id` to its payload key.
    pub async fn resolve(&self, id: &Identifier) -> Result<StorageKey, AppError> {
        self.resolver.resolve(id).await
    }

    /// Fetch the payload for inline delivery.
    ///
    /// The content type is sniffed from the bytes and the length taken from
    /// the byte count whenever the store has none recorded.
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn fetch(&self, id: &Identifier) -> Result<Download, AppError> {
        let key = self.resolver.resolve(id).await?;
        let object = self.storage.get_object(key.as_str()).await?;

        let filename = key.filename().unwrap_or(key.as_str()).to_string();
        let content_type = object
            .content_type
            .unwrap_or_else(|| sniff_content_type(&object.bytes).to_string());
        let content_length = object
            .content_length
            .unwrap_or(object.bytes.len() as u64);

        tracing::debug!(
            key = %key,
            content_type = %content_type,
            size_bytes = content_length,
            "File fetched"
        );

        Ok(Download {
            filename,
            content_type,
            content_length,
            bytes: object.bytes,
        })
    }

    /// Resolve `id` and sign a read URL to redirect the client to.
    pub async fn redirect_url(
        &self,
        id: &Identifier,
        requested_ttl: Option<&str>,
    ) -> Result<SignedUrl, AppError> {
        self.issuer.issue_read(id, requested_ttl).await
    }
}
