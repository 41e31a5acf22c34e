//! WbProvider - metadata enrichment client for a custom movie metadata server.
//!
//! This library crate exposes the enrichment pipeline used by the host
//! binary and by integration tests.

pub mod config;
pub mod error;
pub mod metadata;

pub use error::{Error, Result};
