//! Paginated listing aggregation.

use std::sync::Arc;

use fylz_core::models::{FileListing, FileRecord, ObjectSummary};
use fylz_core::AppError;
use fylz_storage::Storage;

/// Walks the bucket listing and projects raw entries into `FileRecord`s.
#[derive(Clone)]
pub struct ListAggregator {
    storage: Arc<dyn Storage>,
}

impl ListAggregator {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// List stored files starting at `continuation_token`.
    ///
    /// With `fetch_all` the listing follows continuation tokens until a
    /// non-truncated page is reached; otherwise it stops after one page and
    /// hands back the token so the caller can resume. An empty first page
    /// means the bucket holds nothing and is reported as `NotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        continuation_token: Option<&str>,
        fetch_all: bool,
    ) -> Result<FileListing, AppError> {
        let mut items = Vec::new();
        let mut token = continuation_token.map(str::to_string);
        let mut pages = 0usize;

        let next_token = loop {
            let page = self.storage.list_objects(None, token.as_deref()).await?;
            pages += 1;

            if pages == 1 && page.is_empty() {
                return Err(AppError::NotFound("No files found".to_string()));
            }

            let (entries, next_token) = page.into_parts();
            items.extend(entries.iter().filter_map(project));

            match next_token {
                Some(next) if fetch_all => token = Some(next),
                other => break other,
            }
        };

        tracing::debug!(
            pages,
            items = items.len(),
            truncated = next_token.is_some(),
            "Listing aggregated"
        );

        Ok(FileListing {
            items,
            is_truncated: next_token.is_some(),
            next_continuation_token: next_token,
        })
    }
}

/// Project one raw entry; keys without an identifier prefix are dropped.
/// Metadata sidecars are listed like any other object.
fn project(entry: &ObjectSummary) -> Option<FileRecord> {
    let record = FileRecord::from_summary(entry);
    if record.is_none() {
        tracing::debug!(key = %entry.key, "Skipping key without identifier prefix");
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use fylz_storage::MemoryStorage;

    async fn three_pages_of_two() -> MemoryStorage {
        let storage = MemoryStorage::with_page_size("bucket", 2);
        for key in ["a/1.txt", "b/2.txt", "c/3.txt", "d/4.txt", "e/5.txt", "f/6.txt"] {
            storage.insert_raw(key, Bytes::from_static(b"data")).await;
        }
        storage
    }

    #[tokio::test]
    async fn test_single_page_returns_token() {
        let storage = three_pages_of_two().await;
        let listing = ListAggregator::new(Arc::new(storage))
            .list(None, false)
            .await
            .unwrap();

        assert_eq!(listing.items.len(), 2);
        assert!(listing.is_truncated);
        assert!(listing.next_continuation_token.is_some());
        assert_eq!(listing.items[0].id, "a");
        assert_eq!(listing.items[0].filename, "1.txt");
        assert_eq!(listing.items[0].size, 4);
    }

    #[tokio::test]
    async fn test_fetch_all_walks_every_page() {
        let storage = three_pages_of_two().await;
        let listing = ListAggregator::new(Arc::new(storage))
            .list(None, true)
            .await
            .unwrap();

        assert_eq!(listing.items.len(), 6);
        assert!(!listing.is_truncated);
        assert_eq!(listing.next_continuation_token, None);
    }

    #[tokio::test]
    async fn test_resume_from_token() {
        let storage = three_pages_of_two().await;
        let aggregator = ListAggregator::new(Arc::new(storage));

        let first = aggregator.list(None, false).await.unwrap();
        let second = aggregator
            .list(first.next_continuation_token.as_deref(), false)
            .await
            .unwrap();
        let ids: Vec<_> = second.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_empty_bucket_is_not_found() {
        let storage = MemoryStorage::new("bucket");
        let err = ListAggregator::new(Arc::new(storage))
            .list(None, true)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_malformed_keys_are_dropped_and_sidecars_listed() {
        let storage = MemoryStorage::new("bucket");
        storage.insert_raw("orphan", Bytes::from_static(b"x")).await;
        storage.insert_raw("abc/.meta.info", Bytes::from_static(b"{}")).await;
        storage.insert_raw("abc/report.pdf", Bytes::from_static(b"%PDF-")).await;

        let listing = ListAggregator::new(Arc::new(storage))
            .list(None, false)
            .await
            .unwrap();
        let filenames: Vec<_> = listing.items.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(filenames, vec![".meta.info", "report.pdf"]);
        assert!(listing.items.iter().all(|r| r.id == "abc"));
    }

    #[tokio::test]
    async fn test_sidecar_only_bucket_lists_sidecars() {
        let storage = MemoryStorage::new("bucket");
        storage.insert_raw("abc/.meta.info", Bytes::from_static(b"{}")).await;

        let listing = ListAggregator::new(Arc::new(storage))
            .list(None, true)
            .await
            .unwrap();
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].filename, ".meta.info");
        assert_eq!(listing.items[0].size, 2);
    }

    #[tokio::test]
    async fn test_entries_but_no_matches_is_empty_listing() {
        let storage = MemoryStorage::new("bucket");
        storage.insert_raw("orphan", Bytes::from_static(b"x")).await;

        let listing = ListAggregator::new(Arc::new(storage))
            .list(None, false)
            .await
            .unwrap();
        assert!(listing.items.is_empty());
        assert!(!listing.is_truncated);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let storage = MemoryStorage::new("bucket");
        storage.set_failing(true);
        let err = ListAggregator::new(Arc::new(storage))
            .list(None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
