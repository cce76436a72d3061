//! API credentials for Kraken private endpoints
//!
//! # Security
//!
//! The API secret is decoded from base64 once, at construction, and kept in a
//! `secrecy::SecretBox`, which:
//! - Zeroizes memory on drop
//! - Keeps the bytes out of `Debug` output
//! - Requires explicit access via `expose_secret()`

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use secrecy::{ExposeSecret, SecretBox};

use crate::error::{AuthError, AuthResult};
use crate::signer;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "KRAKEN_API_KEY";

/// Environment variable holding the base64-encoded API secret
pub const API_SECRET_ENV: &str = "KRAKEN_API_SECRET";

/// API credentials for authenticated requests
pub struct Credentials {
    /// API key (sent in the `API-Key` header)
    api_key: String,
    /// Decoded API secret, zeroized on drop
    secret: SecretBox<Vec<u8>>,
}

impl Credentials {
    /// Create credentials from an API key and a base64-encoded secret
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] if the key is empty or holds
    /// characters not allowed in an HTTP header, or if the secret is not
    /// valid base64 or decodes to nothing.
    pub fn new(api_key: impl Into<String>, secret: impl AsRef<str>) -> AuthResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AuthError::InvalidCredentials("API key is empty".to_string()));
        }
        // Sent verbatim as the API-Key header value
        if api_key.bytes().any(|b| b.is_ascii_control()) {
            return Err(AuthError::InvalidCredentials(
                "API key contains control characters".to_string(),
            ));
        }

        let decoded = BASE64.decode(secret.as_ref().trim()).map_err(|e| {
            AuthError::InvalidCredentials(format!("secret is not valid base64: {}", e))
        })?;

        if decoded.is_empty() {
            return Err(AuthError::InvalidCredentials("secret is empty".to_string()));
        }

        Ok(Self {
            api_key,
            secret: SecretBox::new(Box::new(decoded)),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `KRAKEN_API_KEY` and `KRAKEN_API_SECRET`.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let secret = std::env::var(API_SECRET_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_SECRET_ENV.to_string()))?;

        Self::new(api_key, secret)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign an already-encoded POST body
    ///
    /// See [`signer::sign_post_data`] for the algorithm.
    pub fn sign(&self, path: &str, nonce: &str, post_data: &str) -> AuthResult<String> {
        signer::sign_post_data(path, nonce, post_data, self.secret.expose_secret())
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.secret.expose_secret()
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret: SecretBox::new(Box::new(self.secret.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", prefix))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str =
        "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("test_api_key", "dGVzdF9wcml2YXRlX2tleQ==").unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("test_private_key"));
        assert!(!debug.contains("test_api_key"));
        assert!(debug.contains("test_api..."));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_invalid_base64_secret_rejected() {
        let result = Credentials::new("key", "not base64!!");
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = Credentials::new("key", "");
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[test]
    fn test_unusable_api_key_rejected() {
        for key in ["", "bad\nkey", "bad\rkey", "tab\tkey"] {
            let result = Credentials::new(key, SECRET);
            assert!(
                matches!(result, Err(AuthError::InvalidCredentials(_))),
                "key {:?} accepted",
                key
            );
        }
    }

    #[test]
    fn test_secret_surrounding_whitespace_ignored() {
        let creds = Credentials::new("key", format!("  {}\n", SECRET)).unwrap();
        assert_eq!(creds.secret().len(), 64);
    }

    #[test]
    fn test_clone_signs_identically() {
        let creds = Credentials::new("API_KEY", SECRET).unwrap();
        let cloned = creds.clone();
        assert_eq!(cloned.api_key(), "API_KEY");

        let a = creds.sign("/0/private/Balance", "1", "nonce=1").unwrap();
        let b = cloned.sign("/0/private/Balance", "1", "nonce=1").unwrap();
        assert_eq!(a, b);
    }
}
