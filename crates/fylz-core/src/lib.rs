//! Fylz Core Library
//!
//! This crate provides the domain types shared across all Fylz components:
//! configuration, the error taxonomy, storage key conventions, client-facing
//! models and content sniffing.

pub mod config;
pub mod constants;
pub mod error;
pub mod keys;
pub mod models;
pub mod sniff;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use keys::{Identifier, ObjectKind, StorageKey};
pub use storage_types::StorageBackend;
