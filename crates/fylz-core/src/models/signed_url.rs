use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::keys::{Identifier, StorageKey};

/// What a signed URL lets its bearer do with the target object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Read,
    Write,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Read => "read",
            Capability::Write => "write",
        }
    }
}

/// A time-boxed credential for one storage key. Never persisted.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub id: Identifier,
    pub key: StorageKey,
    pub url: String,
    pub expiry: DateTime<Utc>,
    pub capability: Capability,
}

/// Signed URL response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignedUrlResponse {
    /// Identifier the URL reads from or writes to
    pub id: String,
    /// Presigned URL
    pub url: String,
    /// URL expiration time
    pub expiry: DateTime<Utc>,
}

impl From<SignedUrl> for SignedUrlResponse {
    fn from(signed: SignedUrl) -> Self {
        SignedUrlResponse {
            id: signed.id.to_string(),
            url: signed.url,
            expiry: signed.expiry,
        }
    }
}
