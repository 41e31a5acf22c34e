//! HTTP and filesystem access for the metadata provider.
//!
//! [`RemoteClient`] talks to the metadata server over plain HTTP:
//!
//! | Operation | Method | Path        | Form body              |
//! |-----------|--------|-------------|------------------------|
//! | fetch     | POST   | `/metadata` | `postBody=<base name>` |
//! | search    | POST   | `/search`   | `query=<name>`         |
//!
//! Poster images are served either by plain GET or, for share paths, by
//! reading the translated local file.
//!
//! Every operation races the caller's [`CancellationToken`] and returns
//! [`Error::Cancelled`] as soon as it fires.

use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::images::{content_type_for_path, ImageData};
use super::paths::{is_share_path, PathTranslator};
use super::provider::{RawMetadataPayload, ServerAddress};
use crate::config::Config;
use crate::error::{Error, Result};

const METADATA_PATH: &str = "/metadata";
const SEARCH_PATH: &str = "/search";

/// Client for the metadata server and for poster images.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    translator: PathTranslator,
}

impl RemoteClient {
    /// Create a client with the given request timeout and share mappings.
    pub fn new(timeout: Duration, translator: PathTranslator) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, translator })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.client.timeout(),
            PathTranslator::new(config.shares.clone()),
        )
    }

    pub fn translator(&self) -> &PathTranslator {
        &self.translator
    }

    /// Fetch the metadata record keyed by `file_base_name`.
    ///
    /// A non-2xx status is [`Error::NotFound`]; an undecodable (or `null`)
    /// 2xx body is [`Error::MalformedResponse`].
    pub async fn fetch_metadata(
        &self,
        address: &ServerAddress,
        file_base_name: &str,
        cancel: &CancellationToken,
    ) -> Result<RawMetadataPayload> {
        let url = address.endpoint(METADATA_PATH);
        info!(url = %url, file_base_name, "Fetching metadata");

        cancellable(cancel, self.request_metadata(&url, file_base_name)).await
    }

    /// Search the server by name. A `null` body is an empty result list.
    pub async fn search_metadata(
        &self,
        address: &ServerAddress,
        query_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawMetadataPayload>> {
        let url = address.endpoint(SEARCH_PATH);
        info!(url = %url, query = query_name, "Searching metadata");

        cancellable(cancel, self.request_search(&url, query_name)).await
    }

    /// Download an image over HTTP(S).
    ///
    /// The content type comes from the `Content-Type` header, or from the
    /// URL's file extension when the header is missing.
    pub async fn fetch_remote_image(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ImageData> {
        info!(url, "Fetching remote image");

        cancellable(cancel, self.download_image(url)).await
    }

    /// Read an image from the local filesystem after share-path translation.
    ///
    /// A missing file (or a path that is not a regular file) is
    /// [`Error::NotFound`]; other read failures are [`Error::Io`].
    pub async fn fetch_local_image(
        &self,
        share_path: &str,
        cancel: &CancellationToken,
    ) -> Result<ImageData> {
        let local_path = self.translator.translate(share_path);
        info!(share_path, local_path = %local_path, "Reading local image");

        cancellable(cancel, read_local_image(&local_path)).await
    }

    /// Fetch image bytes for `url`, routing share paths to the filesystem
    /// and `http`/`https` URLs to the network.
    ///
    /// Anything else is rejected with [`Error::UnsupportedUrlFormat`].
    pub async fn fetch_image(&self, url: &str, cancel: &CancellationToken) -> Result<ImageData> {
        if is_share_path(url) {
            return self.fetch_local_image(url, cancel).await;
        }

        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                self.fetch_remote_image(url, cancel).await
            }
            _ => {
                warn!(url, "Unsupported image URL format");
                Err(Error::unsupported_url(url))
            }
        }
    }

    async fn request_metadata(&self, url: &str, file_base_name: &str) -> Result<RawMetadataPayload> {
        let response = self.post_form(url, &[("postBody", file_base_name)]).await?;
        let body = response.text().await?;
        debug!(url, body = %body, "Metadata response");

        match serde_json::from_str::<Option<RawMetadataPayload>>(&body) {
            Ok(Some(payload)) => Ok(payload),
            Ok(None) => {
                warn!(url, "Metadata response was null");
                Err(Error::malformed("null metadata payload"))
            }
            Err(e) => {
                error!(url, error = %e, body = %body, "Failed to decode metadata JSON");
                Err(Error::malformed(e.to_string()))
            }
        }
    }

    async fn request_search(&self, url: &str, query_name: &str) -> Result<Vec<RawMetadataPayload>> {
        let response = self.post_form(url, &[("query", query_name)]).await?;
        let body = response.text().await?;

        match serde_json::from_str::<Option<Vec<RawMetadataPayload>>>(&body) {
            Ok(results) => Ok(results.unwrap_or_default()),
            Err(e) => {
                error!(url, error = %e, body = %body, "Failed to decode search JSON");
                Err(Error::malformed(e.to_string()))
            }
        }
    }

    async fn download_image(&self, url: &str) -> Result<ImageData> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = %status, "Remote image request failed");
            return Err(Error::not_found(format!("HTTP {status} from {url}")));
        }

        let content_type = match response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            Some(value) => value.to_string(),
            None => {
                let path = Url::parse(url)
                    .map(|u| u.path().to_string())
                    .unwrap_or_default();
                content_type_for_path(&path).to_string()
            }
        };
        let bytes = response.bytes().await?;

        info!(url, bytes = bytes.len(), content_type = %content_type, "Fetched remote image");
        Ok(ImageData::new(bytes, content_type))
    }

    /// POST a form body and turn a non-2xx status into [`Error::NotFound`].
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Response> {
        let response = self.client.post(url).form(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url, status = %status, body = %body, "Metadata server returned error status");
            return Err(Error::not_found(format!("HTTP {status} from {url}")));
        }

        Ok(response)
    }
}

async fn read_local_image(local_path: &str) -> Result<ImageData> {
    match tokio::fs::metadata(local_path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            warn!(local_path, "Image path is not a file");
            return Err(Error::not_found(local_path));
        }
        Err(e) => return Err(read_error(local_path, e)),
    }

    let bytes = match tokio::fs::read(local_path).await {
        Ok(bytes) => bytes,
        Err(e) => return Err(read_error(local_path, e)),
    };
    let content_type = content_type_for_path(local_path);

    info!(local_path, bytes = bytes.len(), content_type, "Read local image");
    Ok(ImageData::new(bytes, content_type))
}

/// A vanished file is [`Error::NotFound`], whichever call noticed it.
fn read_error(local_path: &str, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        warn!(local_path, "Image file does not exist");
        Error::not_found(local_path)
    } else {
        Error::Io(err)
    }
}

/// Run `fut` unless `cancel` fires first.
async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}
