//! Authentication for Kraken's private REST API
//!
//! This crate holds everything a private request needs before it reaches the
//! wire: credentials, a per-client nonce counter, and the HMAC-SHA512 signer.
//! It performs no I/O.
//!
//! # Example
//!
//! ```no_run
//! use kraken_auth::{Credentials, NonceCounter, RequestSigner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load credentials from environment
//!     let creds = Credentials::from_env()?;
//!     let nonces = NonceCounter::new();
//!
//!     let nonce = nonces.next().to_string();
//!     let params = vec![("nonce", nonce.as_str()), ("asset", "ZUSD")];
//!
//!     let signed = RequestSigner::new(&creds, "/0/private/TradeBalance").sign(&params, &nonce)?;
//!     println!("API-Sign: {}", signed.signature);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod nonce;
mod signer;

pub use credentials::{Credentials, API_KEY_ENV, API_SECRET_ENV};
pub use error::{AuthError, AuthResult};
pub use nonce::NonceCounter;
pub use signer::{compute_signature, encode_params, sign_post_data, RequestSigner, SignedPayload};
