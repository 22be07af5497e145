//! Fylz API Library
//!
//! This crate provides the HTTP handlers, error mapping and application setup
//! for the file gateway.

mod api_doc;
mod handlers;
mod middleware;
mod telemetry;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
