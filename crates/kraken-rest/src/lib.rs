//! REST API client for Kraken cryptocurrency exchange
//!
//! This crate is a thin gateway to Kraken's HTTP API: it dispatches named
//! public and private methods, signs private calls, sends them through a
//! pluggable transport and normalizes every response into a single
//! `Result<serde_json::Value, RestError>`.
//!
//! # Features
//!
//! - **Method catalog**: market data (`Time`, `Ticker`, `Depth`, ...) and
//!   account/trading/funding methods (`Balance`, `AddOrder`, `Withdraw`, ...)
//! - **Authentication**: HMAC-SHA512 signing with a per-client nonce counter
//! - **Error normalization**: Kraken's `error` array mapped to typed errors
//! - **Pluggable transport**: reqwest by default, any [`transport::HttpTransport`]
//!
//! # Example
//!
//! ```no_run
//! use kraken_rest::{KrakenRestClient, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public methods (no auth required)
//!     let client = KrakenRestClient::public()?;
//!     let ticker = client
//!         .invoke("Ticker", Params::new().with("pair", "XBTUSD"))?
//!         .await?;
//!     println!("BTC/USD: {}", ticker);
//!
//!     // Private methods (auth required)
//!     let auth_client = KrakenRestClient::from_env()?;
//!     let balance = auth_client.invoke("Balance", Params::new())?.await?;
//!     println!("Balances: {}", balance);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! `invoke` returns an error immediately for problems with the call itself
//! (unknown method, missing credentials). Awaiting the returned [`Call`] yields
//! transport, protocol and exchange-reported errors. Nothing is retried.

pub mod client;
pub mod config;
pub mod error;
pub mod method;
pub mod params;
pub mod response;
pub mod transport;

// Re-export main types
pub use client::{Call, KrakenRestClient};
pub use config::{ClientConfig, ClientOptions};
pub use error::{RestError, RestResult};
pub use method::{Method, Visibility};
pub use params::{ParamValue, Params};
pub use response::{ErrorCategory, RemoteErrorCode};

pub use kraken_auth::Credentials;
