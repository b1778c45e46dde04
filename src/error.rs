//! Error types for reelfinder

use thiserror::Error;

/// Result type alias for reelfinder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Substring the provider embeds in error payloads when a key's daily quota is spent.
const QUOTA_EXCEEDED_MARKER: &str = "quotaExceeded";

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

/// Errors raised by the video search provider.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Video API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Video API reported an error: {0}")]
    ErrorPayload(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to video API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// How the pipeline should react to an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The active credential is out of quota: rotate and retry.
    Quota,
    /// The provider failed in some other way: go straight to scraping.
    Upstream,
    /// Not a provider failure (cancellation).
    Other,
}

/// Classify an API error.
///
/// This is the only place that inspects provider error text. If the provider
/// changes how it reports exhausted quota, update the marker here.
pub fn classify(err: &ApiError) -> ErrorClass {
    match err {
        ApiError::Status { body, .. } | ApiError::ErrorPayload(body)
            if body.contains(QUOTA_EXCEEDED_MARKER) =>
        {
            ErrorClass::Quota
        }
        ApiError::Cancelled => ErrorClass::Other,
        _ => ErrorClass::Upstream,
    }
}

/// Errors from the HTML scrape fallback. Never surfaced to callers.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Scrape request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Scrape target returned {0}")]
    Status(u16),
}

/// Cache storage errors. The pipeline treats all of them as a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cache I/O error: {0}")]
    Io(String),

    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Cache value could not be encoded: {0}")]
    Codec(String),

    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Create ~/.reelfinder/config.yaml or set REELFINDER_API_KEYS.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No video API keys configured. Add api_keys to the config file or set REELFINDER_API_KEYS.")]
    MissingApiKey,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
