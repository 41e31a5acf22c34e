//! Error types for the metadata client.
//!
//! Every failure the remote client can report maps onto one of these
//! variants. The enrichment service never lets them reach the host; it logs
//! them and degrades to a neutral result instead.

/// Error type for remote metadata and image operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be delivered (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status, or a local file is missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A 2xx response carried a body that could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// An image URL that is neither a share path nor an http(s) URL.
    #[error("Unsupported URL format: {0}")]
    UnsupportedUrlFormat(String),

    /// A local file existed but could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller cancelled the operation before it completed.
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new MalformedResponse error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a new UnsupportedUrlFormat error.
    pub fn unsupported_url<S: Into<String>>(url: S) -> Self {
        Self::UnsupportedUrlFormat(url.into())
    }

    /// Whether this error means "nothing there" rather than a broken exchange.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias using the crate Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("HTTP 404 from /metadata");
        assert_eq!(err.to_string(), "Not found: HTTP 404 from /metadata");

        let err = Error::malformed("expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "Malformed response: expected value at line 1 column 1"
        );

        let err = Error::unsupported_url("ftp://host/poster.jpg");
        assert_eq!(
            err.to_string(),
            "Unsupported URL format: ftp://host/poster.jpg"
        );

        assert_eq!(Error::Cancelled.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::not_found("x").is_not_found());
        assert!(!Error::malformed("x").is_not_found());
        assert!(!Error::Cancelled.is_not_found());
    }
}
