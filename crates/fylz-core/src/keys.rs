//! Storage key conventions.
//!
//! Every uploaded file lives at `{identifier}/{filename}`. The identifier is an
//! opaque random token and acts as a namespace prefix: the payload object and
//! any metadata sidecars (`{identifier}/.meta.{name}`) share it. Key
//! construction and classification are centralized here so the resolver,
//! the listing projection and every backend agree on the layout.

use std::fmt::{Display, Formatter, Result as FmtResult};

use uuid::Uuid;

use crate::constants::{KEY_SEPARATOR, METADATA_MARKER};
use crate::error::AppError;

/// Client-visible opaque token naming one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Mint a fresh identifier from the process-wide random source.
    pub fn generate() -> Self {
        Identifier(Uuid::new_v4().to_string())
    }

    /// Accept a client-supplied identifier.
    ///
    /// Identifiers are opaque, so anything non-empty without a key separator
    /// is accepted; unknown identifiers simply resolve to nothing.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::BadRequest("Missing required parameter: id".to_string()));
        }
        if trimmed.contains(KEY_SEPARATOR) {
            return Err(AppError::BadRequest(format!(
                "Invalid id '{}': must not contain '{}'",
                trimmed, KEY_SEPARATOR
            )));
        }
        Ok(Identifier(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Listing prefix covering the payload and all sidecars: `{id}/`.
    pub fn prefix(&self) -> String {
        format!("{}{}", self.0, KEY_SEPARATOR)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Concrete address of one stored object: `{identifier}/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(id: &Identifier, filename: &str) -> Self {
        StorageKey(format!("{}{}{}", id.as_str(), KEY_SEPARATOR, filename))
    }

    /// Wrap a key exactly as the store reported it.
    pub fn from_raw(key: impl Into<String>) -> Self {
        StorageKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split on the first separator into `(identifier, filename)`.
    ///
    /// Keys without a separator are root-level objects and do not split.
    pub fn split(&self) -> Option<(&str, &str)> {
        split_key(&self.0)
    }

    /// Filename part of the key, the suffix after the identifier prefix.
    pub fn filename(&self) -> Option<&str> {
        self.split().map(|(_, filename)| filename)
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Role of an object within an identifier's namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// The uploaded file itself.
    Payload,
    /// A reserved sidecar that is never returned as the file.
    Metadata,
}

impl ObjectKind {
    pub fn classify(key: &str) -> Self {
        match split_key(key) {
            Some((_, filename)) if filename.starts_with(METADATA_MARKER) => ObjectKind::Metadata,
            _ => ObjectKind::Payload,
        }
    }

    pub fn is_metadata(self) -> bool {
        matches!(self, ObjectKind::Metadata)
    }
}

fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(KEY_SEPARATOR)
}

/// Validate a client-supplied filename before it becomes part of a key.
pub fn validate_filename(filename: &str) -> Result<&str, AppError> {
    if filename.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required parameter: filename".to_string(),
        ));
    }
    if filename.starts_with(METADATA_MARKER) {
        return Err(AppError::BadRequest(format!(
            "Filename must not start with reserved marker '{}'",
            METADATA_MARKER
        )));
    }
    if filename.starts_with(KEY_SEPARATOR) || filename.split(KEY_SEPARATOR).any(|s| s == "..") {
        return Err(AppError::BadRequest(
            "Filename contains invalid path segments".to_string(),
        ));
    }
    Ok(filename)
}
