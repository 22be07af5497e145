use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::object::ObjectSummary;

/// Client-facing projection of one stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileRecord {
    /// Identifier the file was uploaded under
    pub id: String,
    /// Name the file was uploaded with
    pub filename: String,
    /// Object size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Project a listing entry, splitting its key on the first separator.
    ///
    /// Returns `None` for root-level keys, which carry no identifier.
    pub fn from_summary(entry: &ObjectSummary) -> Option<Self> {
        let (id, filename) = entry.key.split_once(crate::constants::KEY_SEPARATOR)?;
        Some(FileRecord {
            id: id.to_string(),
            filename: filename.to_string(),
            size: entry.size,
        })
    }
}

/// Listing response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileListing {
    pub items: Vec<FileRecord>,
    /// Token to resume from when the listing stopped early
    pub next_continuation_token: Option<String>,
    pub is_truncated: bool,
}

/// Response after a single raw upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub id: String,
}

/// Response after a multipart upload: uploaded filename to assigned id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MultipartUploadResponse {
    pub ids: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_splits_first_separator() {
        let record = FileRecord::from_summary(&ObjectSummary::new("abc/dir/x.txt", 7)).unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.filename, "dir/x.txt");
        assert_eq!(record.size, 7);
    }

    #[test]
    fn test_projection_drops_root_level_keys() {
        assert!(FileRecord::from_summary(&ObjectSummary::new("orphan", 3)).is_none());
    }

    #[test]
    fn test_listing_shape() {
        let listing = FileListing {
            items: vec![],
            next_continuation_token: None,
            is_truncated: false,
        };
        let json = serde_json::to_value(&listing).expect("serialize");
        assert!(json.get("items").is_some());
        assert!(json.get("next_continuation_token").is_some());
        assert_eq!(json.get("is_truncated"), Some(&serde_json::json!(false)));
    }
}
