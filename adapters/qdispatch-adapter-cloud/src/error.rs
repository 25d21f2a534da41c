//! Error types for the cloud adapter.

use thiserror::Error;

/// Errors from the cloud service API.
#[derive(Debug, Error)]
pub enum CloudError {
    /// API token is missing.
    #[error("Cloud API token not configured")]
    MissingToken,

    /// Authentication was rejected by the service.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Job not found on the remote side.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success API response.
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        message: String,
    },
}

/// Result type for cloud operations.
pub type CloudResult<T> = Result<T, CloudError>;
