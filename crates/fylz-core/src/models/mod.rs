//! Client-facing and store-facing data models.

pub mod file;
pub mod object;
pub mod signed_url;

pub use file::{FileListing, FileRecord, MultipartUploadResponse, UploadResponse};
pub use object::{ListingPage, ObjectSummary, StoredObject};
pub use signed_url::{Capability, SignedUrl, SignedUrlResponse};
