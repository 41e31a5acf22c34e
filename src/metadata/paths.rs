//! Translation of network-share paths into local filesystem paths.
//!
//! The metadata server reports poster locations as share paths such as
//! `\\shun920\av\Movies\x.jpg`. When the share is mounted locally, the same
//! file is reachable at `/volume1/av/Movies/x.jpg`.

use crate::config::{default_shares, ShareMapping};

/// Prefix that marks a share-style path.
pub const SHARE_PREFIX: &str = "\\\\";

/// Whether `path` is written in share form (`\\host\share\...`).
pub fn is_share_path(path: &str) -> bool {
    path.starts_with(SHARE_PREFIX)
}

/// Rewrites share paths onto local mount points.
///
/// Mappings are tried in order; the first whose host and share match wins.
/// Anything that does not match is returned unchanged.
#[derive(Debug, Clone)]
pub struct PathTranslator {
    mappings: Vec<ShareMapping>,
}

impl PathTranslator {
    pub fn new(mappings: Vec<ShareMapping>) -> Self {
        Self { mappings }
    }

    /// Translate `share_path` to a local path, or pass it through untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbprovider::metadata::PathTranslator;
    ///
    /// let translator = PathTranslator::default();
    /// assert_eq!(
    ///     translator.translate(r"\\shun920\av\Movies\x.jpg"),
    ///     "/volume1/av/Movies/x.jpg"
    /// );
    /// assert_eq!(translator.translate(r"\\other\share\x.jpg"), r"\\other\share\x.jpg");
    /// ```
    pub fn translate(&self, share_path: &str) -> String {
        if !is_share_path(share_path) {
            return share_path.to_string();
        }

        let parts: Vec<&str> = share_path.trim_start_matches('\\').split('\\').collect();
        if parts.len() < 2 {
            return share_path.to_string();
        }

        let (host, share, rest) = (parts[0], parts[1], &parts[2..]);
        match self
            .mappings
            .iter()
            .find(|m| m.host == host && m.share == share)
        {
            Some(mapping) => format!(
                "{}/{}",
                mapping.local_root.trim_end_matches('/'),
                rest.join("/")
            ),
            None => share_path.to_string(),
        }
    }
}

impl Default for PathTranslator {
    fn default() -> Self {
        Self::new(default_shares())
    }
}
