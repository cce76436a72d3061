//! Error types for REST API operations

use crate::response::{ErrorCategory, RemoteErrorCode};
use crate::transport::TransportError;
use kraken_auth::AuthError;
use serde_json::Value;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Method name is not in the catalog
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Credentials or request parameters could not be used
    #[error("Configuration error: {0}")]
    Configuration(#[from] AuthError),

    /// Private method called on a client without credentials
    #[error("Authentication required for private method {0}")]
    AuthRequired(String),

    /// A configured value cannot be sent as an HTTP header
    #[error("Invalid value for header {name}: {reason}")]
    InvalidHeader {
        /// Header name
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Callback delivery needs a Tokio runtime and none is running
    #[error("No async runtime available: {0}")]
    Runtime(String),

    /// Request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response body is not a JSON object
    #[error("Protocol error: {message}")]
    Protocol {
        /// Parser diagnostic
        message: String,
        /// Body as received
        raw: String,
    },

    /// Kraken reported an error code
    #[error("API error: {0}")]
    Remote(RemoteErrorCode),

    /// Kraken reported errors in an unrecognized shape
    #[error("Unrecognized API error: {}", Value::Array(.errors.clone()))]
    UnknownRemote {
        /// The `error` field exactly as received
        errors: Vec<Value>,
    },
}

impl RestError {
    /// The remote error code, if Kraken reported one
    pub fn remote_code(&self) -> Option<&RemoteErrorCode> {
        match self {
            Self::Remote(code) => Some(code),
            _ => None,
        }
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.remote_code().is_some_and(RemoteErrorCode::is_rate_limit)
    }

    /// Check if retrying the same call could succeed
    ///
    /// Network failures, service unavailability and rate limits are
    /// retryable. A request the transport refused to build is not. A retried
    /// private call needs a fresh nonce.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(TransportError::InvalidRequest(_)) => false,
            Self::Transport(_) => true,
            Self::Remote(code) => {
                code.is_rate_limit() || code.category() == ErrorCategory::Service
            }
            Self::InvalidMethod(_)
            | Self::Configuration(_)
            | Self::AuthRequired(_)
            | Self::InvalidHeader { .. }
            | Self::Runtime(_)
            | Self::Protocol { .. }
            | Self::UnknownRemote { .. } => false,
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rate_limit_is_retryable() {
        let err = RestError::Remote(RemoteErrorCode::new("API:Rate limit exceeded"));
        assert!(err.is_rate_limited());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_service_unavailable_is_retryable() {
        let err = RestError::Remote(RemoteErrorCode::new("Service:Unavailable"));
        assert!(!err.is_rate_limited());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_recovery_classification() {
        let timeout = RestError::Transport(TransportError::Timeout(Duration::from_secs(5)));
        assert!(timeout.is_retryable());

        let invalid = RestError::Remote(RemoteErrorCode::new("General:Invalid arguments"));
        assert!(!invalid.is_retryable());

        assert!(!RestError::InvalidMethod("Nope".to_string()).is_retryable());
        assert!(!RestError::AuthRequired("Balance".to_string()).is_retryable());
        assert!(!RestError::Runtime("no reactor running".to_string()).is_retryable());
    }

    #[test]
    fn test_unbuildable_request_is_not_retryable() {
        let err = RestError::Transport(TransportError::InvalidRequest("builder error".to_string()));
        assert!(!err.is_retryable());

        let err = RestError::Transport(TransportError::RequestFailed("reset by peer".to_string()));
        assert!(err.is_retryable());

        let err = RestError::InvalidHeader {
            name: "User-Agent".to_string(),
            reason: "failed to parse header value".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Invalid value for header User-Agent: failed to parse header value"
        );
    }

    #[test]
    fn test_error_display() {
        let err = RestError::InvalidMethod("Nope".to_string());
        assert_eq!(err.to_string(), "Invalid method: Nope");

        let err = RestError::UnknownRemote {
            errors: vec![Value::String("Unparseable".to_string())],
        };
        assert_eq!(err.to_string(), r#"Unrecognized API error: ["Unparseable"]"#);
    }
}
