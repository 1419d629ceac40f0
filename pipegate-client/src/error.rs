//! Error types for the pipeline client

use pipegate_core::dto::MissingField;
use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the remote service
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (DNS, connect, timeout, reset)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Credential rejected (401/403)
    #[error("authentication failed (status {status}): {message}")]
    Unauthorized {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned any other error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Response parsed but lacked a required field
    #[error(transparent)]
    MissingField(#[from] MissingField),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Map a non-success status and its body to the matching variant
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        let message = body.into();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized {
                status: status.as_u16(),
                message,
            },
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::api_error(status.as_u16(), message),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if the credential was rejected
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Errors after which repeating the same request may succeed
    ///
    /// Transport failures, throttling, 5xx and malformed payloads qualify.
    /// Rejected credentials and vanished resources never do.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ParseError(_) | Self::MissingField(_) => true,
            Self::ApiError { status, .. } => *status == 429 || *status >= 500,
            Self::Unauthorized { .. } | Self::NotFound(_) => false,
        }
    }

    /// Errors that must abort any flow immediately
    pub fn is_fatal(&self) -> bool {
        self.is_unauthorized() || self.is_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        let err = ClientError::from_status(StatusCode::UNAUTHORIZED, "bad token");
        assert!(err.is_unauthorized());
        assert!(err.is_fatal());
        assert!(!err.is_transient());

        let err = ClientError::from_status(StatusCode::FORBIDDEN, "");
        assert!(err.is_unauthorized());

        let err = ClientError::from_status(StatusCode::NOT_FOUND, "no such build");
        assert!(err.is_not_found());
        assert!(err.is_fatal());
    }

    #[test]
    fn test_server_errors_are_transient() {
        let err = ClientError::from_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert!(err.is_transient());
        assert!(!err.is_fatal());

        let err = ClientError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(err.is_transient());
    }

    #[test]
    fn test_bad_request_is_neither() {
        let err = ClientError::from_status(StatusCode::BAD_REQUEST, "invalid body");
        assert!(matches!(err, ClientError::ApiError { status: 400, .. }));
        assert!(!err.is_transient());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_missing_field_is_transient() {
        let err = ClientError::from(MissingField("records"));
        assert!(err.is_transient());
        assert_eq!(
            err.to_string(),
            "response is missing required field `records`"
        );
    }
}
