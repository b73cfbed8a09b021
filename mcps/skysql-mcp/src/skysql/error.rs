//! Error types for SkySQL API calls

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the SkySQL REST API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API key environment variable is unset or empty
    #[error("{0} not configured")]
    MissingApiKey(String),

    /// The API key cannot be sent as a header value
    #[error("{0} contains characters that are not valid in an HTTP header")]
    InvalidApiKey(String),

    /// The request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// The API answered with a non-2xx status
    #[error("server returned {status}")]
    Status {
        /// HTTP status returned by the API
        status: StatusCode,
        /// Raw response body, kept for logging only
        body: String,
    },

    /// Connection, TLS or protocol failure
    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    /// The response body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this is a configuration problem rather than a network one
    pub fn is_config(&self) -> bool {
        matches!(self, ApiError::MissingApiKey(_) | ApiError::InvalidApiKey(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

/// Result type alias for SkySQL API operations
pub type ApiResult<T> = Result<T, ApiError>;
