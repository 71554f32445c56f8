//! HMAC primitives for request signing and webhook verification.
//!
//! OAuth 1.0a request signatures are base64-encoded HMAC digests, while
//! Context.IO webhook callbacks carry a hex-encoded HMAC-SHA256 digest.
//!
//! # Security
//!
//! All signature comparisons use constant-time comparison to prevent timing
//! attacks.
//!
//! # Example
//!
//! ```rust
//! use contextio_lite::auth::hmac::{compute_hex_sha256, constant_time_compare};
//!
//! let signature = compute_hex_sha256("1400000000token", "secret").unwrap();
//! assert_eq!(signature.len(), 64);
//! assert!(constant_time_compare(&signature, &signature));
//! ```

use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::auth::SigningError;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

fn digest_sha1(message: &[u8], key: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| SigningError::InvalidKeyLength)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn digest_sha256(message: &[u8], key: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SigningError::InvalidKeyLength)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Computes a base64-encoded HMAC-SHA1 digest.
///
/// # Errors
///
/// Returns [`SigningError::InvalidKeyLength`] if the key is rejected by the
/// MAC implementation.
pub fn compute_base64_sha1(message: &str, key: &str) -> Result<String, SigningError> {
    digest_sha1(message.as_bytes(), key.as_bytes()).map(|bytes| BASE64_STANDARD.encode(bytes))
}

/// Computes a base64-encoded HMAC-SHA256 digest.
///
/// # Errors
///
/// Returns [`SigningError::InvalidKeyLength`] if the key is rejected by the
/// MAC implementation.
pub fn compute_base64_sha256(message: &str, key: &str) -> Result<String, SigningError> {
    digest_sha256(message.as_bytes(), key.as_bytes()).map(|bytes| BASE64_STANDARD.encode(bytes))
}

/// Computes a lowercase hex-encoded HMAC-SHA256 digest.
///
/// # Errors
///
/// Returns [`SigningError::InvalidKeyLength`] if the key is rejected by the
/// MAC implementation.
pub fn compute_hex_sha256(message: &str, key: &str) -> Result<String, SigningError> {
    digest_sha256(message.as_bytes(), key.as_bytes()).map(hex::encode)
}

/// Performs constant-time comparison of two strings.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    // ConstantTimeEq handles different lengths securely
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut result = String::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            result.push(char::from(HEX_CHARS[usize::from(byte >> 4)]));
            result.push(char::from(HEX_CHARS[usize::from(byte & 0x0f)]));
        }
        result
    }
}
