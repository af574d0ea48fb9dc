//! Error types for remote service calls.

use thiserror::Error;

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Retry policy class for remote failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    Retryable,
    Permanent,
}

/// Errors that can occur while talking to a remote service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx response from the remote service
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Invalid request (missing required data, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication error (missing or malformed credential)
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl RemoteError {
    /// Create an API error from status and body
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Only rate limiting and server errors are retried. Transport failures
    /// carry no status and surface immediately.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Api { status, .. } => classify_http_status(*status),
            _ => RetryClass::Permanent,
        }
    }
}

/// Classify an HTTP status into retry behaviour.
pub fn classify_http_status(status: u16) -> RetryClass {
    match status {
        429 | 500..=599 => RetryClass::Retryable,
        _ => RetryClass::Permanent,
    }
}

impl From<RemoteError> for avery_sync_core::Error {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Api { status, body } => Self::Remote { status, body },
            RemoteError::Auth(message) => Self::NotConfigured(message),
            RemoteError::InvalidRequest(message) => Self::InvalidInput(message),
            RemoteError::Http(err) => Self::Transport(err.to_string()),
            RemoteError::Json(err) => Self::Transport(format!("Invalid response body: {}", err)),
        }
    }
}
