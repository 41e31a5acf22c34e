//! Poster image payloads.

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;

/// Raw image bytes together with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageData {
    #[serde(skip)]
    pub bytes: Bytes,
    pub content_type: String,
}

impl ImageData {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Determine content type from a file extension (case-insensitive).
pub fn content_type_for_path(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}
