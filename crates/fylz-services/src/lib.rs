//! Fylz Services Layer
//!
//! This crate hosts the gateway's domain logic: resolving identifiers to
//! storage keys, aggregating paginated listings, issuing signed URLs and
//! orchestrating ingestion and retrieval. Every component is constructed
//! with an explicit `Arc<dyn Storage>` so tests can inject the in-memory
//! backend. HTTP handling stays in fylz-api.

pub mod listing;
pub mod resolver;
pub mod signing;
pub mod transfer;

pub use fylz_storage::Storage;
pub use listing::ListAggregator;
pub use resolver::KeyResolver;
pub use signing::{SignedAccessIssuer, TtlPolicy};
pub use transfer::{Download, TransferGateway, UploadPart};
