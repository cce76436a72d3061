//! Error types for authentication operations

/// Errors that can occur while loading credentials or signing a request
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// API secret could not be decoded or used as an HMAC key
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Request parameters could not be form-encoded
    #[error("Failed to encode request parameters: {0}")]
    Encoding(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("KRAKEN_API_KEY".to_string());
        assert!(err.to_string().contains("KRAKEN_API_KEY"));

        let err = AuthError::InvalidCredentials("secret is not valid base64".to_string());
        assert!(err.to_string().starts_with("Invalid credentials"));
    }
}
