//! Client configuration

use crate::method::Method;
use kraken_auth::{AuthError, Credentials};
use secrecy::SecretString;
use std::time::Duration;

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.kraken.com";

/// API version segment of the request path
pub const DEFAULT_API_VERSION: &str = "0";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("kraken-rest/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding an optional one-time password
pub const OTP_ENV: &str = "KRAKEN_OTP";

/// Options accepted by [`KrakenRestClient::new`](crate::KrakenRestClient::new)
///
/// A bare string converts into options carrying only a one-time password:
///
/// ```
/// use kraken_rest::ClientOptions;
///
/// let options: ClientOptions = "123456".into();
/// assert!(options.otp.is_some());
/// assert!(options.version.is_none());
/// ```
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// API version (default `"0"`)
    pub version: Option<String>,
    /// One-time password sent with every private call
    pub otp: Option<String>,
    /// Request timeout (default 5 seconds)
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set one-time password
    pub fn with_otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(otp.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&str> for ClientOptions {
    fn from(otp: &str) -> Self {
        Self::new().with_otp(otp)
    }
}

impl From<String> for ClientOptions {
    fn from(otp: String) -> Self {
        Self::new().with_otp(otp)
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("version", &self.version)
            .field("otp", &self.otp.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client configuration
///
/// Fixed once the client is built.
#[derive(Debug)]
pub struct ClientConfig {
    /// Scheme and host, without trailing path
    pub base_url: String,
    /// API version path segment
    pub version: String,
    /// API credentials (optional, required for private methods)
    pub credentials: Option<Credentials>,
    /// One-time password injected into private calls
    pub otp: Option<SecretString>,
    /// Request timeout
    pub timeout: Duration,
    /// User agent
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            credentials: None,
            otp: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with defaults and no credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Load credentials and optional one-time password from the environment
    ///
    /// Reads `KRAKEN_API_KEY`, `KRAKEN_API_SECRET` and, if set, `KRAKEN_OTP`.
    pub fn from_env() -> Result<Self, AuthError> {
        let mut config = Self::new().with_credentials(Credentials::from_env()?);
        if let Ok(otp) = std::env::var(OTP_ENV) {
            config = config.with_otp(otp);
        }
        Ok(config)
    }

    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set API version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set one-time password
    pub fn with_otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(SecretString::from(otp.into()));
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Apply construction options on top of this configuration
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        if let Some(version) = options.version {
            self = self.with_version(version);
        }
        if let Some(otp) = options.otp {
            self = self.with_otp(otp);
        }
        if let Some(timeout) = options.timeout {
            self = self.with_timeout(timeout);
        }
        self
    }

    /// Request path for `method`, e.g. `/0/private/Balance`
    pub fn path_for(&self, method: Method) -> String {
        format!(
            "/{}/{}/{}",
            self.version,
            method.visibility().as_str(),
            method.name()
        )
    }

    /// Absolute URL for a request path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
