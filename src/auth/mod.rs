//! Authentication for the Context.IO Lite API.
//!
//! Context.IO uses two-legged OAuth 1.0a: every request is signed with the
//! application's consumer key and secret, and no per-user token exchange
//! takes place.
//!
//! # Overview
//!
//! - [`OAuthSigner`]: Builds signed `Authorization` headers
//! - [`SignatureMethod`]: HMAC algorithm used for signatures
//! - [`hmac`]: HMAC helpers shared with webhook verification
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
//!     SignatureMethod::default(),
//! );
//! assert_eq!(signer.method().as_str(), "HMAC-SHA1");
//! ```

pub mod hmac;
mod oauth1;

pub use oauth1::{
    generate_nonce, percent_encode, signature_base_string, OAuthSigner, SignatureMethod,
};

use thiserror::Error;

/// Errors raised while computing a signature.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SigningError {
    /// The MAC implementation rejected the signing key.
    #[error("HMAC signing key has an invalid length")]
    InvalidKeyLength,
}
