//! Main REST client implementation
//!
//! [`KrakenRestClient::invoke`] resolves the method, allocates the nonce and
//! signs the request before returning. Anything wrong with the call itself
//! (unknown method, missing credentials) is therefore reported immediately,
//! and only the network exchange is left to the returned [`Call`].

use crate::config::{ClientConfig, ClientOptions};
use crate::error::{RestError, RestResult};
use crate::method::{Method, Visibility};
use crate::params::{ParamValue, Params};
use crate::response;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use futures::future::BoxFuture;
use kraken_auth::{encode_params, Credentials, NonceCounter, RequestSigner};
use reqwest::header::HeaderValue;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Kraken REST API client
///
/// Cheap to clone; clones share configuration, nonce counter and transport.
///
/// # Example
///
/// ```no_run
/// use kraken_rest::{KrakenRestClient, Params};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public methods only
///     let client = KrakenRestClient::public()?;
///     let time = client.invoke("Time", Params::new())?.await?;
///     println!("Server time: {}", time);
///
///     // With authentication for private methods
///     let client = KrakenRestClient::new("API_KEY", "c2VjcmV0", "123456")?;
///     let balance = client.invoke("Balance", Params::new())?.await?;
///     println!("Balance: {}", balance);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct KrakenRestClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    nonces: NonceCounter,
    transport: Arc<dyn HttpTransport>,
}

impl KrakenRestClient {
    /// Create a client with credentials
    ///
    /// `options` is a [`ClientOptions`] or a bare one-time password string.
    ///
    /// # Errors
    /// [`RestError::Configuration`] if the secret is not valid base64.
    pub fn new(
        api_key: impl Into<String>,
        secret: impl AsRef<str>,
        options: impl Into<ClientOptions>,
    ) -> RestResult<Self> {
        let credentials = Credentials::new(api_key, secret)?;
        let config = ClientConfig::default()
            .with_credentials(credentials)
            .with_options(options.into());
        Self::with_config(config)
    }

    /// Create a client without credentials
    ///
    /// Only public methods will be available.
    pub fn public() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client from `KRAKEN_API_KEY`, `KRAKEN_API_SECRET` and optional `KRAKEN_OTP`
    pub fn from_env() -> RestResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a client with custom configuration and the default HTTP transport
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client with custom configuration and transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        info!(
            base_url = %config.base_url,
            version = %config.version,
            authenticated = config.credentials.is_some(),
            "Created Kraken REST client"
        );

        Self {
            inner: Arc::new(ClientInner {
                config,
                nonces: NonceCounter::new(),
                transport,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Check if the client has credentials for private methods
    pub fn has_credentials(&self) -> bool {
        self.inner.config.credentials.is_some()
    }

    /// Last nonce allocated by this client's counter
    pub fn last_nonce(&self) -> Option<u64> {
        self.inner.nonces.last_issued()
    }

    /// Prepare a call to the method named `method`
    ///
    /// # Errors
    /// Fails before any I/O with [`RestError::InvalidMethod`] if `method` is not
    /// in the catalog, [`RestError::AuthRequired`] for a private method without
    /// credentials, [`RestError::Configuration`] if signing fails, or
    /// [`RestError::InvalidHeader`] if a configured value cannot be sent.
    ///
    /// ```no_run
    /// # use kraken_rest::{KrakenRestClient, Params};
    /// # async fn example(client: KrakenRestClient) -> Result<(), kraken_rest::RestError> {
    /// let ticker = client
    ///     .invoke("Ticker", Params::new().with("pair", "XBTUSD"))?
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn invoke(&self, method: &str, params: Params) -> RestResult<Call> {
        let method: Method = method.parse()?;
        self.invoke_method(method, params)
    }

    /// Prepare a call to a catalog method
    pub fn invoke_method(&self, method: Method, mut params: Params) -> RestResult<Call> {
        let config = &self.inner.config;
        let path = config.path_for(method);

        let mut headers = vec![
            ("User-Agent".to_string(), config.user_agent.clone()),
            ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
        ];

        let (body, nonce) = match method.visibility() {
            Visibility::Public => (encode_params(&params)?, None),
            Visibility::Private => {
                let credentials = config
                    .credentials
                    .as_ref()
                    .ok_or_else(|| RestError::AuthRequired(method.name().to_string()))?;

                let nonce = self.nonce_for(&mut params);
                if let Some(otp) = &config.otp {
                    params.insert("otp", otp.expose_secret());
                }

                let signer = RequestSigner::new(credentials, &path);
                let signed = signer.sign(&params, &nonce)?;

                headers.push(("API-Key".to_string(), signer.api_key().to_string()));
                headers.push(("API-Sign".to_string(), signed.signature));

                (signed.post_data, Some(nonce))
            }
        };

        check_headers(&headers)?;

        debug!(%method, %path, "Prepared request");

        Ok(Call {
            method,
            nonce,
            params,
            request: HttpRequest {
                url: config.url_for(&path),
                headers,
                body,
                timeout: config.timeout,
            },
            transport: Arc::clone(&self.inner.transport),
        })
    }

    /// Prepare a call and deliver its result to `callback` from a spawned task
    ///
    /// Errors detected before I/O are returned directly and the callback is
    /// never invoked; otherwise the callback receives the result exactly once.
    ///
    /// # Errors
    /// [`RestError::Runtime`] when called outside a Tokio runtime, plus
    /// everything [`invoke`](Self::invoke) can return.
    pub fn invoke_with<F>(&self, method: &str, params: Params, callback: F) -> RestResult<JoinHandle<()>>
    where
        F: FnOnce(RestResult<Value>) + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| RestError::Runtime(e.to_string()))?;
        let call = self.invoke(method, params)?;
        Ok(runtime.spawn(async move { callback(call.await) }))
    }

    /// Use the caller's nonce if present, otherwise allocate one
    fn nonce_for(&self, params: &mut Params) -> String {
        if let Some(supplied) = params.get("nonce") {
            let supplied = supplied.to_form_value();
            match (supplied.parse::<u64>(), self.inner.nonces.last_issued()) {
                (Ok(n), Some(last)) if n <= last => {
                    warn!(nonce = n, last_issued = last, "Caller-supplied nonce does not increase");
                }
                (Err(_), _) => warn!(nonce = %supplied, "Caller-supplied nonce is not numeric"),
                _ => {}
            }
            return supplied;
        }

        let nonce = self.inner.nonces.next();
        params.insert("nonce", ParamValue::UInt(nonce));
        nonce.to_string()
    }
}

/// Reject values the HTTP layer would refuse, before a nonce goes on the wire
fn check_headers(headers: &[(String, String)]) -> RestResult<()> {
    for (name, value) in headers {
        HeaderValue::from_str(value).map_err(|e| RestError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

impl std::fmt::Debug for KrakenRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenRestClient")
            .field("base_url", &self.inner.config.base_url)
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// A built, signed request waiting to be sent
///
/// Await it (or call [`send`](Self::send)) to perform the request. Dropping it
/// sends nothing; the nonce it carries is simply never used.
pub struct Call {
    method: Method,
    nonce: Option<String>,
    params: Params,
    request: HttpRequest,
    transport: Arc<dyn HttpTransport>,
}

impl Call {
    pub fn method(&self) -> Method {
        self.method
    }

    /// Nonce sent with a private call
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// Final parameters, including injected `nonce` and `otp`
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The request that will be sent
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Send the request and normalize the response
    #[instrument(skip(self), fields(method = %self.method))]
    pub async fn send(self) -> RestResult<Value> {
        debug!(url = %self.request.url, "Sending request");

        let response = self.transport.post(self.request).await.map_err(|e| {
            warn!(error = %e, "Transport failure");
            RestError::Transport(e)
        })?;

        debug!(status = response.status, "Normalizing response");
        response::normalize(&response.body)
    }
}

impl IntoFuture for Call {
    type Output = RestResult<Value>;
    type IntoFuture = BoxFuture<'static, RestResult<Value>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}

impl std::fmt::Debug for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("method", &self.method)
            .field("url", &self.request.url)
            .field("nonce", &self.nonce)
            .finish()
    }
}
