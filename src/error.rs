//! Error types for the Firecrawl client.

use thiserror::Error;

/// Result type for Firecrawl client operations.
pub type Result<T> = std::result::Result<T, FirecrawlError>;

/// Firecrawl client errors.
#[derive(Debug, Error)]
pub enum FirecrawlError {
    /// Configuration error (missing API key, invalid settings)
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid request parameters, rejected before any network call
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Network error (connection failed, timeout, no response obtained)
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx API response, after any retries are exhausted.
    /// Carries the status code and the raw response body for diagnostics.
    #[error("HTTP {status} - {message}")]
    Http {
        status: u16,
        message: String,
        body: String,
    },

    /// Response body could not be decoded into the expected shape
    #[error("decode error: {0}")]
    Decode(String),

    /// The API responded but reported an application-level failure
    /// (`success: false`, usually with a `warning` message)
    #[error("{0}")]
    Api(String),
}

impl FirecrawlError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        FirecrawlError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for FirecrawlError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FirecrawlError::Decode(err.to_string())
        } else {
            FirecrawlError::Network(err.to_string())
        }
    }
}
