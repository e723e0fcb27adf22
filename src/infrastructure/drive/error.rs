use thiserror::Error;

/// Errors that can occur when talking to the Graph drive API
#[derive(Error, Debug)]
pub enum DriveApiError {
    /// Invalid request parameters or malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed due to an invalid or expired access token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Requested item or path does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded, retry after waiting
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// API server encountered an internal error
    #[error("API server error: {0}")]
    ServerError(String),

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization or deserialization error
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Unknown error occurred
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl DriveApiError {
    /// Returns true if this error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        match self {
            DriveApiError::RateLimitExceeded | DriveApiError::ServerError(_) => true,
            DriveApiError::NetworkError(err) => err.is_timeout() || err.is_connect(),
            _ => false,
        }
    }

    /// Create an error from an HTTP status code and response body
    ///
    /// - 400: invalid request
    /// - 401, 403: authentication failed
    /// - 404: not found
    /// - 429: rate limit exceeded
    /// - 5xx: server error
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => DriveApiError::InvalidRequest(body),
            401 | 403 => DriveApiError::AuthenticationFailed(body),
            404 => DriveApiError::NotFound(body),
            429 => DriveApiError::RateLimitExceeded,
            500..=599 => DriveApiError::ServerError(body),
            _ => DriveApiError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }
}
