//! Identifier to storage key resolution.

use std::sync::Arc;

use fylz_core::{AppError, Identifier, StorageKey};
use fylz_storage::Storage;

/// Locates the payload object stored under an identifier's prefix.
///
/// Metadata sidecars share the prefix and are skipped. When several payload
/// objects exist under one identifier, the first one in the store's listing
/// order wins; uniqueness is not enforced at write time.
#[derive(Clone)]
pub struct KeyResolver {
    storage: Arc<dyn Storage>,
}

impl KeyResolver {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Resolve `id` to the key of its payload object.
    ///
    /// Returns `AppError::NotFound` when nothing, or only metadata, is stored
    /// under the identifier. Listing failures surface as storage errors.
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn resolve(&self, id: &Identifier) -> Result<StorageKey, AppError> {
        let prefix = id.prefix();
        let mut continuation_token: Option<String> = None;
        let mut seen_entries = 0usize;

        loop {
            let page = self
                .storage
                .list_objects(Some(&prefix), continuation_token.as_deref())
                .await?;
            seen_entries += page.entries.len();

            if let Some(entry) = page.entries.iter().find(|e| !e.kind().is_metadata()) {
                let key = entry.storage_key();
                tracing::debug!(key = %key, "Resolved identifier");
                return Ok(key);
            }

            match page.next_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        if seen_entries == 0 {
            Err(AppError::NotFound(format!("No file found for id {}", id)))
        } else {
            tracing::debug!(
                metadata_objects = seen_entries,
                "Only metadata stored under identifier"
            );
            Err(AppError::NotFound(format!("No payload found for id {}", id)))
        }
    }
}
