//! Metadata enrichment against the remote metadata server.
//!
//! # Module layout
//!
//! - [`provider`] -- Value types and the capability traits.
//! - [`paths`] -- Share-path to local-path translation.
//! - [`parser`] -- Normalisation of raw server payloads.
//! - [`images`] -- Image bytes and content-type inference.
//! - [`client`] -- HTTP and filesystem access.
//! - [`enrichment`] -- Orchestration consumed by the host.

pub mod client;
pub mod enrichment;
pub mod images;
pub mod parser;
pub mod paths;
pub mod provider;

pub use client::RemoteClient;
pub use enrichment::EnrichmentService;
pub use images::ImageData;
pub use parser::MetadataParser;
pub use paths::PathTranslator;
pub use provider::{
    EnrichmentResult, ImageRecord, ImageSource, ImageType, MediaMetadata, MediaQuery,
    MetadataSource, Person, PersonType, RawMetadataPayload, SearchResult, ServerAddress,
};
