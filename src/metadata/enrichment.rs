//! Enrichment service consumed by the host.
//!
//! The [`EnrichmentService`] turns a [`MediaQuery`] into an
//! [`EnrichmentResult`] by fetching the raw record from the metadata server,
//! normalising it with [`MetadataParser`], and merging it with what the host
//! already knows. It also answers searches and serves poster images.
//!
//! Nothing here returns an error to the host: every failure is logged and
//! degrades to a neutral result (fallback metadata, empty list, `None`).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::client::RemoteClient;
use super::images::ImageData;
use super::parser::{production_year, MetadataParser};
use super::provider::{
    EnrichmentResult, ImageRecord, ImageSource, MediaQuery, MetadataSource, SearchResult,
    ServerAddress, PROVIDER_NAME,
};
use crate::config::Config;
use crate::error::{Error, Result};

/// Metadata and image provider backed by the remote metadata server.
///
/// Holds no per-request state; one instance can serve any number of
/// concurrent queries.
///
/// # Example
///
/// ```rust,ignore
/// let service = EnrichmentService::from_config(&config)?;
/// let cancel = CancellationToken::new();
/// let query = MediaQuery::new("ABC-123", "/volume1/av/ABC-123.mp4");
/// let result = service.enrich(&config.server.address(), &query, &cancel).await;
/// ```
#[derive(Debug, Clone)]
pub struct EnrichmentService {
    client: RemoteClient,
    parser: MetadataParser,
}

impl EnrichmentService {
    pub fn new(client: RemoteClient) -> Self {
        Self {
            client,
            parser: MetadataParser::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(RemoteClient::from_config(config)?))
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }
}

/// Log a failed operation at a level matching its error class.
fn log_failure(operation: &str, address: Option<&ServerAddress>, err: &Error) {
    let server = address.map(ToString::to_string).unwrap_or_default();
    if err.is_not_found() {
        warn!(operation, server = %server, error = %err, "No result from metadata provider");
    } else if matches!(err, Error::Cancelled) {
        debug!(operation, server = %server, "Operation cancelled");
    } else {
        error!(operation, server = %server, error = %err, "Metadata provider request failed");
    }
}

#[async_trait]
impl MetadataSource for EnrichmentService {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn enrich(
        &self,
        address: &ServerAddress,
        query: &MediaQuery,
        cancel: &CancellationToken,
    ) -> EnrichmentResult {
        let file_base_name = query.file_base_name();
        info!(
            name = %query.display_name,
            file_base_name = %file_base_name,
            server = %address,
            "Starting metadata enrichment"
        );

        let raw = match self
            .client
            .fetch_metadata(address, &file_base_name, cancel)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                log_failure("enrich", Some(address), &e);
                return EnrichmentResult::fallback(query);
            }
        };

        let mut metadata = self.parser.parse(&raw);
        let has_metadata = metadata.has_content();

        if metadata.title.is_empty() {
            metadata.title = query.display_name.clone();
        }
        if metadata.production_year.is_none() {
            metadata.production_year = query.known_year;
        }

        info!(
            title = %metadata.title,
            has_metadata,
            production_year = ?metadata.production_year,
            studios = ?metadata.studios,
            poster = ?metadata.poster_url,
            "Finished metadata enrichment"
        );

        EnrichmentResult {
            has_metadata,
            metadata,
        }
    }

    async fn search(
        &self,
        address: &ServerAddress,
        query_name: &str,
        cancel: &CancellationToken,
    ) -> Vec<SearchResult> {
        let raw_results = match self.client.search_metadata(address, query_name, cancel).await {
            Ok(results) => results,
            Err(e) => {
                log_failure("search", Some(address), &e);
                return Vec::new();
            }
        };

        let results: Vec<SearchResult> = raw_results
            .into_iter()
            .map(|raw| SearchResult {
                production_year: production_year(raw.create_time.as_deref()),
                name: raw.title.unwrap_or_default(),
                image_url: raw.poster_url.filter(|url| !url.is_empty()),
                provider_name: PROVIDER_NAME.to_string(),
            })
            .collect();

        info!(query = query_name, results = results.len(), "Search completed");
        results
    }
}

#[async_trait]
impl ImageSource for EnrichmentService {
    async fn resolve_images(
        &self,
        address: &ServerAddress,
        query: &MediaQuery,
        cancel: &CancellationToken,
    ) -> Vec<ImageRecord> {
        let file_base_name = query.file_base_name();

        match self
            .client
            .fetch_metadata(address, &file_base_name, cancel)
            .await
        {
            Ok(raw) => match raw.poster_url.filter(|url| !url.is_empty()) {
                Some(url) => {
                    info!(file_base_name = %file_base_name, url = %url, "Resolved poster image");
                    vec![ImageRecord::primary(url)]
                }
                None => {
                    debug!(file_base_name = %file_base_name, "No poster in metadata");
                    Vec::new()
                }
            },
            Err(e) => {
                log_failure("resolve_images", Some(address), &e);
                Vec::new()
            }
        }
    }

    async fn image_response(&self, url: &str, cancel: &CancellationToken) -> Option<ImageData> {
        match self.client.fetch_image(url, cancel).await {
            Ok(image) => Some(image),
            Err(e) => {
                log_failure("image_response", None, &e);
                None
            }
        }
    }
}
