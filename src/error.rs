//! Photoreel error types

/// Photoreel error types
#[derive(Debug, thiserror::Error)]
pub enum PhotoreelError {
    // Upstream/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// The catalog answered, but reported a failure in its own envelope
    /// (e.g. Flickr's `"stat": "fail"`).
    #[error("catalog error ({code}): {message}")]
    Catalog { code: i64, message: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for PhotoreelError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => PhotoreelError::UpstreamStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => PhotoreelError::Http(err.to_string()),
        }
    }
}

/// Result type alias for Photoreel operations
pub type Result<T> = std::result::Result<T, PhotoreelError>;
