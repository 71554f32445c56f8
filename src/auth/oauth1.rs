//! Two-legged OAuth 1.0a request signing.
//!
//! Context.IO authenticates every API call with an OAuth 1.0a signature
//! computed from the consumer key and secret alone (no access token). This
//! module builds the signature base string, signs it and renders the
//! `Authorization` header.
//!
//! # Example
//!
//! ```rust
//! use contextio_lite::auth::{OAuthSigner, SignatureMethod};
//! use contextio_lite::{ConsumerKey, ConsumerSecret};
//!
//! let signer = OAuthSigner::new(
//!     &ConsumerKey::new("key").unwrap(),
//!     &ConsumerSecret::new("secret").unwrap(),
//!     SignatureMethod::HmacSha1,
//! );
//!
//! let header = signer
//!     .authorization_header("GET", "https://api.context.io/lite/users", &[])
//!     .unwrap();
//! assert!(header.starts_with("OAuth "));
//! ```

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::auth::hmac::{compute_base64_sha1, compute_base64_sha256};
use crate::auth::SigningError;
use crate::config::{ConsumerKey, ConsumerSecret};

/// Length of generated `oauth_nonce` values.
const NONCE_LENGTH: usize = 32;

/// The OAuth protocol version sent with every request.
const OAUTH_VERSION: &str = "1.0";

/// HMAC algorithm used to sign requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SignatureMethod {
    /// `HMAC-SHA1`, the method Context.IO documents.
    #[default]
    HmacSha1,
    /// `HMAC-SHA256`.
    HmacSha256,
}

impl SignatureMethod {
    /// Returns the `oauth_signature_method` value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HmacSha1 => "HMAC-SHA1",
            Self::HmacSha256 => "HMAC-SHA256",
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percent-encodes a value per RFC 3986, leaving only unreserved characters.
#[must_use]
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Generates a random alphanumeric `oauth_nonce`.
#[must_use]
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

/// Builds the OAuth 1.0a signature base string.
///
/// `url` must not carry a query string; query and form parameters belong in
/// `params`. Parameters are encoded, then sorted by key and value.
#[must_use]
pub fn signature_base_string(http_method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        http_method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&normalized)
    )
}

/// Signs requests with a consumer key and secret.
#[derive(Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
    method: SignatureMethod,
}

impl fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"*****")
            .field("method", &self.method)
            .finish()
    }
}

impl OAuthSigner {
    /// Creates a signer for the given consumer credentials.
    #[must_use]
    pub fn new(key: &ConsumerKey, secret: &ConsumerSecret, method: SignatureMethod) -> Self {
        Self {
            consumer_key: key.as_ref().to_string(),
            consumer_secret: secret.as_ref().to_string(),
            method,
        }
    }

    /// Returns the configured signature method.
    #[must_use]
    pub const fn method(&self) -> SignatureMethod {
        self.method
    }

    /// Builds an `Authorization` header with a fresh nonce and the current
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError`] if the signature cannot be computed.
    pub fn authorization_header(
        &self,
        http_method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> Result<String, SigningError> {
        let nonce = generate_nonce();
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(http_method, url, params, &nonce, timestamp)
    }

    /// Builds an `Authorization` header for a fixed nonce and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError`] if the signature cannot be computed.
    pub fn authorization_header_with(
        &self,
        http_method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<String, SigningError> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                self.method.as_str().to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ];

        let mut signed_params = oauth_params.clone();
        signed_params.extend_from_slice(params);

        let signature = self.sign(&signature_base_string(http_method, url, &signed_params))?;
        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let fields = oauth_params
            .iter()
            .map(|(key, value)| format!("{key}=\"{}\"", percent_encode(value)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {fields}"))
    }

    /// Signs a base string. The signing key is `enc(secret)&` (empty token secret).
    fn sign(&self, base_string: &str) -> Result<String, SigningError> {
        let key = format!("{}&", percent_encode(&self.consumer_secret));
        match self.method {
            SignatureMethod::HmacSha1 => compute_base64_sha1(base_string, &key),
            SignatureMethod::HmacSha256 => compute_base64_sha256(base_string, &key),
        }
    }
}

// Verify OAuthSigner is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthSigner>();
};
