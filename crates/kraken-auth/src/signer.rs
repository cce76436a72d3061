//! HMAC-SHA512 request signing
//!
//! Kraken signature algorithm:
//! 1. SHA256(nonce + POST data), kept as raw digest bytes
//! 2. HMAC-SHA512(secret, URI path + SHA256 digest)
//! 3. Base64 encode result
//!
//! The URI path is signed verbatim, so it must be exactly the path used in the
//! request line (e.g. `/0/private/Balance`).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256, Sha512};
use tracing::trace;

use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};

type HmacSha512 = Hmac<Sha512>;

/// URL-encode parameters in the order the serializer yields them
pub fn encode_params<T: Serialize + ?Sized>(params: &T) -> AuthResult<String> {
    serde_urlencoded::to_string(params).map_err(|e| AuthError::Encoding(e.to_string()))
}

/// Sign an already-encoded POST body
///
/// # Arguments
/// * `path` - Request path, signed as raw bytes
/// * `nonce` - Decimal nonce, as it appears in the body
/// * `post_data` - URL-encoded POST body, already containing the nonce
/// * `secret` - Decoded API secret
///
/// # Returns
/// Base64-encoded signature
pub fn sign_post_data(
    path: &str,
    nonce: &str,
    post_data: &str,
    secret: &[u8],
) -> AuthResult<String> {
    let mut sha256 = Sha256::new();
    sha256.update(nonce.as_bytes());
    sha256.update(post_data.as_bytes());
    let digest = sha256.finalize();

    let mut mac = HmacSha512::new_from_slice(secret)
        .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;
    mac.update(path.as_bytes());
    mac.update(&digest);

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Encode `params` and sign the result
pub fn compute_signature<T: Serialize + ?Sized>(
    path: &str,
    params: &T,
    nonce: &str,
    secret: &[u8],
) -> AuthResult<String> {
    let post_data = encode_params(params)?;
    sign_post_data(path, nonce, &post_data, secret)
}

/// POST body together with the signature computed over it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// URL-encoded body, byte-identical to what was signed
    pub post_data: String,
    /// Value for the `API-Sign` header
    pub signature: String,
}

/// Request signer for one private request path
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    path: &'a str,
}

impl<'a> RequestSigner<'a> {
    /// Create a signer for `path`
    pub fn new(credentials: &'a Credentials, path: &'a str) -> Self {
        Self { credentials, path }
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Get the path being signed
    pub fn path(&self) -> &str {
        self.path
    }

    /// Encode the final parameter set once and sign it
    ///
    /// `params` must already contain `nonce` (and `otp`, if used).
    pub fn sign<T: Serialize + ?Sized>(&self, params: &T, nonce: &str) -> AuthResult<SignedPayload> {
        let post_data = encode_params(params)?;
        let signature = sign_post_data(self.path, nonce, &post_data, self.credentials.secret())?;

        trace!(path = self.path, body_len = post_data.len(), "Signed request");

        Ok(SignedPayload {
            post_data,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Example values from Kraken's REST authentication guide
    const SECRET: &str =
        "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";
    const NONCE: &str = "1616492376594";
    const ADD_ORDER_BODY: &str =
        "nonce=1616492376594&ordertype=limit&pair=XBTUSD&price=37500&type=buy&volume=1.25";
    const ADD_ORDER_SIGNATURE: &str =
        "4/dpxb3iT4tp/ZCVEwSnEsLxx0bqyhLpdfOpc6fn7OR8+UClSV5n9E6aSS8MPtnRfp32bAb0nmbRn6H8ndwLUQ==";

    fn credentials() -> Credentials {
        Credentials::new("API_KEY", SECRET).unwrap()
    }

    fn add_order_params() -> Vec<(&'static str, &'static str)> {
        vec![
            ("nonce", NONCE),
            ("ordertype", "limit"),
            ("pair", "XBTUSD"),
            ("price", "37500"),
            ("type", "buy"),
            ("volume", "1.25"),
        ]
    }

    #[test]
    fn test_known_signature() {
        let creds = credentials();
        let signature = creds.sign("/0/private/AddOrder", NONCE, ADD_ORDER_BODY).unwrap();
        assert_eq!(signature, ADD_ORDER_SIGNATURE);
    }

    #[test]
    fn test_compute_signature_from_params() {
        let creds = credentials();
        let signature =
            compute_signature("/0/private/AddOrder", &add_order_params(), NONCE, creds.secret())
                .unwrap();
        assert_eq!(signature, ADD_ORDER_SIGNATURE);
    }

    #[test]
    fn test_signature_is_deterministic() {
        let creds = credentials();
        let params = vec![("nonce", NONCE), ("asset", "ZUSD")];
        let a = compute_signature("/0/private/TradeBalance", &params, NONCE, creds.secret()).unwrap();
        let b = compute_signature("/0/private/TradeBalance", &params, NONCE, creds.secret()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_decodes_to_sha512_mac() {
        let creds = credentials();
        let signature = creds.sign("/0/private/Balance", NONCE, "nonce=1616492376594").unwrap();
        let raw = BASE64.decode(&signature).unwrap();
        assert_eq!(raw.len(), 64);
    }

    #[test]
    fn test_signature_covers_path_and_order() {
        let creds = credentials();
        let base = creds.sign("/0/private/AddOrder", NONCE, ADD_ORDER_BODY).unwrap();

        let other_path = creds.sign("/0/private/CancelOrder", NONCE, ADD_ORDER_BODY).unwrap();
        assert_ne!(base, other_path);

        let reordered = vec![("pair", "XBTUSD"), ("nonce", NONCE)];
        let ordered = vec![("nonce", NONCE), ("pair", "XBTUSD")];
        let a = compute_signature("/0/private/AddOrder", &reordered, NONCE, creds.secret()).unwrap();
        let b = compute_signature("/0/private/AddOrder", &ordered, NONCE, creds.secret()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_signer_returns_signed_body() {
        let creds = credentials();
        let signer = RequestSigner::new(&creds, "/0/private/AddOrder");
        assert_eq!(signer.api_key(), "API_KEY");
        assert_eq!(signer.path(), "/0/private/AddOrder");

        let payload = signer.sign(&add_order_params(), NONCE).unwrap();
        assert_eq!(payload.post_data, ADD_ORDER_BODY);
        assert_eq!(payload.signature, ADD_ORDER_SIGNATURE);
    }

    #[test]
    fn test_encode_params_escapes_values() {
        let encoded = encode_params(&vec![("pair", "XBT/USD"), ("oflags", "post,fciq")]).unwrap();
        assert_eq!(encoded, "pair=XBT%2FUSD&oflags=post%2Cfciq");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Secrets of any length HMAC accepts, as Kraken would hand them out
        fn arb_secret() -> impl Strategy<Value = String> {
            prop::collection::vec(any::<u8>(), 1..128).prop_map(|bytes| BASE64.encode(bytes))
        }

        fn arb_params() -> impl Strategy<Value = Vec<(String, String)>> {
            prop::collection::vec(("[a-z]{1,12}", ".{0,24}"), 0..8)
        }

        fn arb_path() -> impl Strategy<Value = String> {
            "/0/private/[A-Za-z]{1,20}"
        }

        proptest! {
            #[test]
            fn prop_signature_is_deterministic_sha512_mac(
                secret in arb_secret(),
                path in arb_path(),
                params in arb_params(),
                nonce in any::<u64>(),
            ) {
                let creds = Credentials::new("API_KEY", &secret).unwrap();
                let nonce = nonce.to_string();

                let a = compute_signature(&path, &params, &nonce, creds.secret()).unwrap();
                let b = compute_signature(&path, &params, &nonce, creds.secret()).unwrap();
                prop_assert_eq!(&a, &b);
                prop_assert_eq!(BASE64.decode(&a).unwrap().len(), 64);
            }

            #[test]
            fn prop_signer_signs_exactly_the_body_it_returns(
                secret in arb_secret(),
                path in arb_path(),
                params in arb_params(),
                nonce in any::<u64>(),
            ) {
                let creds = Credentials::new("API_KEY", &secret).unwrap();
                let nonce = nonce.to_string();
                let mut params = params;
                params.push(("nonce".to_string(), nonce.clone()));

                let payload = RequestSigner::new(&creds, &path).sign(&params, &nonce).unwrap();
                prop_assert_eq!(&payload.post_data, &encode_params(&params).unwrap());
                prop_assert_eq!(
                    payload.signature,
                    sign_post_data(&path, &nonce, &payload.post_data, creds.secret()).unwrap()
                );
            }

            #[test]
            fn prop_signature_changes_with_nonce(
                secret in arb_secret(),
                params in arb_params(),
                a in any::<u64>(),
                b in any::<u64>(),
            ) {
                prop_assume!(a != b);
                let creds = Credentials::new("API_KEY", &secret).unwrap();
                let path = "/0/private/Balance";

                let first = compute_signature(path, &params, &a.to_string(), creds.secret()).unwrap();
                let second = compute_signature(path, &params, &b.to_string(), creds.secret()).unwrap();
                prop_assert_ne!(first, second);
            }
        }
    }
}
