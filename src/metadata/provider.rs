//! Value types and capability traits for the metadata provider.
//!
//! The provider plays two roles for its host: a metadata source (enrich a
//! single item, search by name) and an image source (list poster records,
//! serve poster bytes). Both roles are expressed as separate traits that
//! [`EnrichmentService`](super::EnrichmentService) implements.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::images::ImageData;
use crate::config::{DEFAULT_SERVER_IP, DEFAULT_SERVER_PORT};

/// Name reported to the host for records this provider produces.
pub const PROVIDER_NAME: &str = "WbProvider";

// ---------------------------------------------------------------------------
// Request inputs
// ---------------------------------------------------------------------------

/// Host and port of the remote metadata server.
///
/// An empty host or port 0 always means the default, however the value was
/// built; [`host`](Self::host) and [`port`](Self::port) apply that rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    /// Build an address, substituting `127.0.0.1` for an empty host and
    /// `8765` for port 0.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        let host = if host.trim().is_empty() {
            DEFAULT_SERVER_IP.to_string()
        } else {
            host.trim().to_string()
        };
        let port = if port == 0 { DEFAULT_SERVER_PORT } else { port };
        Self { host, port }
    }

    /// Effective host, `127.0.0.1` when unset.
    pub fn host(&self) -> &str {
        match self.host.trim() {
            "" => DEFAULT_SERVER_IP,
            host => host,
        }
    }

    /// Effective port, `8765` when unset.
    pub fn port(&self) -> u16 {
        match self.port {
            0 => DEFAULT_SERVER_PORT,
            port => port,
        }
    }

    /// `http://host:port` with no trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host(), self.port())
    }

    /// Full URL for an endpoint path such as `/metadata`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_IP, DEFAULT_SERVER_PORT)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host(), self.port())
    }
}

/// What the host knows about a media item before enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaQuery {
    pub display_name: String,
    pub file_path: String,
    pub known_year: Option<i32>,
}

impl MediaQuery {
    pub fn new(display_name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            file_path: file_path.into(),
            known_year: None,
        }
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.known_year = year;
        self
    }

    /// File name without its last extension; the lookup key on the server.
    pub fn file_base_name(&self) -> String {
        Path::new(&self.file_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Server payload
// ---------------------------------------------------------------------------

/// A metadata record exactly as the server sends it.
///
/// Every field is optional; a missing or `null` field never fails decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMetadataPayload {
    pub title: Option<String>,
    #[serde(rename = "comment1")]
    pub summary: Option<String>,
    /// `yyyy-MM-dd HH:mm:ss`
    pub create_time: Option<String>,
    /// Comma-separated tags, possibly containing `★` rating glyphs.
    #[serde(rename = "tag")]
    pub tag_string: Option<String>,
    #[serde(rename = "comment2")]
    pub poster_url: Option<String>,
    /// Space-separated performer names.
    #[serde(rename = "artist")]
    pub artist_string: Option<String>,
    #[serde(rename = "writer")]
    pub studio: Option<String>,
    pub score: Option<f32>,
}

// ---------------------------------------------------------------------------
// Normalised metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonType {
    Actor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub role: PersonType,
}

impl Person {
    pub fn actor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: PersonType::Actor,
        }
    }
}

/// Canonical metadata record for one movie.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub title: String,
    pub overview: Option<String>,
    pub premiere_date: Option<NaiveDate>,
    /// Always the year of `premiere_date` when produced by the parser.
    pub production_year: Option<i32>,
    /// Zero or one studio.
    pub studios: Vec<String>,
    pub tags: Vec<String>,
    pub cast: Vec<Person>,
    /// One of 2, 4, 6, 8, 10 when present.
    pub community_rating: Option<f32>,
    pub critic_rating: Option<f32>,
    pub poster_url: Option<String>,
}

impl MediaMetadata {
    /// Whether any field was populated from the server payload.
    pub fn has_content(&self) -> bool {
        !self.title.is_empty()
            || self.overview.as_deref().is_some_and(|o| !o.is_empty())
            || self.premiere_date.is_some()
            || !self.studios.is_empty()
            || !self.tags.is_empty()
            || !self.cast.is_empty()
            || self.community_rating.is_some()
            || self.critic_rating.is_some()
            || self.poster_url.is_some()
    }
}

/// Outcome of enriching one [`MediaQuery`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub has_metadata: bool,
    pub metadata: MediaMetadata,
}

impl EnrichmentResult {
    /// Result that keeps only what the host already knew.
    pub fn fallback(query: &MediaQuery) -> Self {
        Self {
            has_metadata: false,
            metadata: MediaMetadata {
                title: query.display_name.clone(),
                production_year: query.known_year,
                ..Default::default()
            },
        }
    }
}

/// A single search hit returned to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub production_year: Option<i32>,
    pub image_url: Option<String>,
    pub provider_name: String,
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageType {
    Primary,
}

/// A poster the host can later request through [`ImageSource::image_response`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub provider_name: String,
    pub url: String,
    pub image_type: ImageType,
}

impl ImageRecord {
    pub fn primary(url: impl Into<String>) -> Self {
        Self {
            provider_name: PROVIDER_NAME.to_string(),
            url: url.into(),
            image_type: ImageType::Primary,
        }
    }
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Metadata role: enrich items and search by name.
///
/// Implementations never fail; every error degrades to a neutral result.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Provider name shown to the host (e.g. `"WbProvider"`).
    fn name(&self) -> &'static str;

    /// Enrich a single item, falling back to what the query already knows.
    async fn enrich(
        &self,
        address: &ServerAddress,
        query: &MediaQuery,
        cancel: &CancellationToken,
    ) -> EnrichmentResult;

    /// Search the server by name. Returns an empty list on any failure.
    async fn search(
        &self,
        address: &ServerAddress,
        query_name: &str,
        cancel: &CancellationToken,
    ) -> Vec<SearchResult>;
}

/// Image role: list poster records and serve their bytes.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Image types this source can produce.
    fn supported_images(&self) -> &'static [ImageType] {
        &[ImageType::Primary]
    }

    /// Poster records for an item, zero or one element.
    async fn resolve_images(
        &self,
        address: &ServerAddress,
        query: &MediaQuery,
        cancel: &CancellationToken,
    ) -> Vec<ImageRecord>;

    /// Bytes for an image URL, or `None` when it cannot be served.
    async fn image_response(&self, url: &str, cancel: &CancellationToken) -> Option<ImageData>;
}
