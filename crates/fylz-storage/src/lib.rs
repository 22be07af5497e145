//! Fylz Storage Library
//!
//! This crate provides the object store abstraction and its implementations.
//! It includes the `Storage` trait, an S3 backend and an in-memory backend.
//!
//! # Object layout
//!
//! Objects live at `{identifier}/{filename}` inside a single bucket. Metadata
//! sidecars share the prefix as `{identifier}/.meta.{name}`. Backends are
//! layout-agnostic: they list, get, put and presign raw keys, and the key
//! conventions live in `fylz_core::keys`.

pub mod factory;
#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use fylz_core::StorageBackend;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
