//! Signed URL issuance and the TTL policy that bounds it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fylz_core::constants::{DEFAULT_URL_TTL_MINUTES, MAX_URL_TTL_MINUTES, MIN_URL_TTL_MINUTES};
use fylz_core::keys::validate_filename;
use fylz_core::models::{Capability, SignedUrl};
use fylz_core::{AppError, Identifier, StorageKey};
use fylz_storage::Storage;

use crate::resolver::KeyResolver;

/// Bounds applied to a client-requested URL lifetime, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub min_minutes: i64,
    pub max_minutes: i64,
    pub default_minutes: i64,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            min_minutes: MIN_URL_TTL_MINUTES,
            max_minutes: MAX_URL_TTL_MINUTES,
            default_minutes: DEFAULT_URL_TTL_MINUTES,
        }
    }
}

impl TtlPolicy {
    /// Turn the raw `ttl` parameter into a lifetime in minutes.
    ///
    /// Missing or non-integer input yields the default; integers are clamped
    /// into `[min, max]` and otherwise honoured as given.
    pub fn resolve(&self, requested: Option<&str>) -> i64 {
        match requested.and_then(|raw| raw.trim().parse::<i64>().ok()) {
            Some(minutes) => minutes.clamp(self.min_minutes, self.max_minutes),
            None => self.default_minutes,
        }
    }
}

/// Issues time-boxed read and write URLs through the store's presigner.
///
/// Issuance is pure computation: nothing is created in the store and no
/// record of issued URLs is kept.
#[derive(Clone)]
pub struct SignedAccessIssuer {
    storage: Arc<dyn Storage>,
    resolver: KeyResolver,
    policy: TtlPolicy,
}

impl SignedAccessIssuer {
    pub fn new(storage: Arc<dyn Storage>, resolver: KeyResolver, policy: TtlPolicy) -> Self {
        Self {
            storage,
            resolver,
            policy,
        }
    }

    /// Sign `key` for `capability` with a lifetime of `ttl_minutes`.
    #[tracing::instrument(skip(self, key), fields(key = %key))]
    pub async fn issue(
        &self,
        id: Identifier,
        key: StorageKey,
        capability: Capability,
        ttl_minutes: i64,
    ) -> Result<SignedUrl, AppError> {
        let ttl_minutes = ttl_minutes.clamp(self.policy.min_minutes, self.policy.max_minutes);
        let expiry = Utc::now() + chrono::Duration::minutes(ttl_minutes);
        let expires_in = Duration::from_secs(ttl_minutes.unsigned_abs() * 60);

        let url = self
            .storage
            .presign(key.as_str(), capability, expires_in)
            .await?;

        tracing::info!(
            id = %id,
            capability = capability.as_str(),
            ttl_minutes,
            "Signed URL issued"
        );

        Ok(SignedUrl {
            id,
            key,
            url,
            expiry,
            capability,
        })
    }

    /// Resolve `id` and sign a download URL for its payload.
    pub async fn issue_read(
        &self,
        id: &Identifier,
        requested_ttl: Option<&str>,
    ) -> Result<SignedUrl, AppError> {
        let key = self.resolver.resolve(id).await?;
        let ttl = self.policy.resolve(requested_ttl);
        self.issue(id.clone(), key, Capability::Read, ttl).await
    }

    /// Mint a fresh identifier and sign an upload URL for `{id}/{filename}`.
    ///
    /// The object does not exist until the client uses the URL.
    pub async fn issue_write(
        &self,
        filename: &str,
        requested_ttl: Option<&str>,
    ) -> Result<SignedUrl, AppError> {
        let filename = validate_filename(filename)?;
        let id = Identifier::generate();
        let key = StorageKey::new(&id, filename);
        let ttl = self.policy.resolve(requested_ttl);
        self.issue(id, key, Capability::Write, ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use fylz_storage::MemoryStorage;

    fn issuer_over(storage: &MemoryStorage) -> SignedAccessIssuer {
        let storage: Arc<dyn Storage> = Arc::new(storage.clone());
        SignedAccessIssuer::new(
            storage.clone(),
            KeyResolver::new(storage),
            TtlPolicy::default(),
        )
    }

    #[test]
    fn test_ttl_clamps_to_bounds() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.resolve(Some("0")), 1);
        assert_eq!(policy.resolve(Some("-4")), 1);
        assert_eq!(policy.resolve(Some("1000")), 30);
    }

    #[test]
    fn test_ttl_defaults_when_missing_or_garbage() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.resolve(None), 5);
        assert_eq!(policy.resolve(Some("")), 5);
        assert_eq!(policy.resolve(Some("ten")), 5);
        assert_eq!(policy.resolve(Some("2.5")), 5);
    }

    #[test]
    fn test_ttl_honours_in_range_values() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.resolve(Some("10")), 10);
        assert_eq!(policy.resolve(Some(" 30 ")), 30);
        assert_eq!(policy.resolve(Some("1")), 1);
    }

    #[tokio::test]
    async fn test_issue_read_resolves_identifier() {
        let storage = MemoryStorage::new("bucket");
        storage.insert_raw("abc/.meta.info", Bytes::from_static(b"{}")).await;
        storage.insert_raw("abc/report.pdf", Bytes::from_static(b"%PDF-")).await;

        let before = Utc::now();
        let signed = issuer_over(&storage)
            .issue_read(&Identifier::parse("abc").unwrap(), Some("10"))
            .await
            .unwrap();

        assert_eq!(signed.key.as_str(), "abc/report.pdf");
        assert_eq!(signed.capability, Capability::Read);
        assert!(signed.url.contains("abc/report.pdf"));
        assert!(signed.url.contains("X-Fylz-Expires=600"));
        assert!(signed.expiry >= before + chrono::Duration::minutes(10));
    }

    #[tokio::test]
    async fn test_issue_read_unknown_identifier_is_not_found() {
        let storage = MemoryStorage::new("bucket");
        let err = issuer_over(&storage)
            .issue_read(&Identifier::parse("nope").unwrap(), None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_issue_write_mints_fresh_identifier() {
        let storage = MemoryStorage::new("bucket");
        let issuer = issuer_over(&storage);

        let first = issuer.issue_write("photo.png", None).await.unwrap();
        let second = issuer.issue_write("photo.png", None).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.capability, Capability::Write);
        assert_eq!(first.key.as_str(), format!("{}/photo.png", first.id));
        assert!(first.url.contains("X-Fylz-Expires=300"));
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_issue_write_rejects_reserved_filename() {
        let storage = MemoryStorage::new("bucket");
        let err = issuer_over(&storage)
            .issue_write(".meta.info", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_presign_failure_is_signing_error() {
        let storage = MemoryStorage::new("bucket");
        storage.set_failing(true);
        let err = issuer_over(&storage)
            .issue_write("a.txt", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Signing(_)));
    }
}
