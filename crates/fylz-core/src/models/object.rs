//! Raw object-store shapes, as returned by a backend before projection.

use bytes::Bytes;

use crate::keys::{ObjectKind, StorageKey};

/// One entry of a raw object listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
}

impl ObjectSummary {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::classify(&self.key)
    }

    pub fn storage_key(&self) -> StorageKey {
        StorageKey::from_raw(self.key.clone())
    }
}

/// One page of a paginated listing.
///
/// A page is truncated exactly when it carries a continuation token; the
/// constructors keep the two fields consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<ObjectSummary>,
    next_token: Option<String>,
}

impl ListingPage {
    /// The final page of a listing.
    pub fn last(entries: Vec<ObjectSummary>) -> Self {
        Self {
            entries,
            next_token: None,
        }
    }

    /// A page followed by more results, resumable with `next_token`.
    pub fn truncated(entries: Vec<ObjectSummary>, next_token: String) -> Self {
        Self {
            entries,
            next_token: Some(next_token),
        }
    }

    /// Build from backend output; an empty token counts as absent.
    pub fn from_parts(entries: Vec<ObjectSummary>, next_token: Option<String>) -> Self {
        match next_token.filter(|t| !t.is_empty()) {
            Some(token) => Self::truncated(entries, token),
            None => Self::last(entries),
        }
    }

    pub fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    pub fn is_truncated(&self) -> bool {
        self.next_token.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_parts(self) -> (Vec<ObjectSummary>, Option<String>) {
        (self.entries, self.next_token)
    }
}

/// Object bytes plus whatever metadata the store recorded.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}
