//! Signature verification for webhook callbacks.
//!
//! # Security
//!
//! All signature comparisons are constant-time.

use crate::auth::hmac::{compute_hex_sha256, constant_time_compare};
use crate::config::ContextIoConfig;
use crate::webhooks::{WebhookCallback, WebhookError};

/// Checks a callback signature against `secret`.
///
/// # Example
///
/// ```rust
/// use contextio_lite::auth::hmac::compute_hex_sha256;
/// use contextio_lite::webhooks::verify_signature;
///
/// let signature = compute_hex_sha256("42tok", "secret").unwrap();
/// assert!(verify_signature(42, "tok", &signature, "secret"));
/// ```
#[must_use]
pub fn verify_signature(timestamp: i64, token: &str, signature: &str, secret: &str) -> bool {
    match compute_hex_sha256(&format!("{timestamp}{token}"), secret) {
        Ok(expected) => constant_time_compare(&expected, &signature.to_ascii_lowercase()),
        Err(error) => {
            tracing::warn!(error = %error, "Could not compute webhook signature");
            false
        }
    }
}

/// Parses a callback body and verifies it with the config's consumer secret.
///
/// # Errors
///
/// Returns [`WebhookError::MalformedPayload`] if the body is not a callback
/// payload, or [`WebhookError::InvalidSignature`] if the signature does not
/// match.
///
/// # Example
///
/// ```rust
/// use contextio_lite::auth::hmac::compute_hex_sha256;
/// use contextio_lite::webhooks::verify_callback;
/// use contextio_lite::{ConsumerKey, ConsumerSecret, ContextIoConfig};
///
/// let config = ContextIoConfig::builder()
///     .consumer_key(ConsumerKey::new("key").unwrap())
///     .consumer_secret(ConsumerSecret::new("secret").unwrap())
///     .build()
///     .unwrap();
///
/// let signature = compute_hex_sha256("1400000000abc", "secret").unwrap();
/// let body = format!(
///     r#"{{"account_id":"u1","webhook_id":"w1","token":"abc","signature":"{signature}","timestamp":1400000000}}"#
/// );
///
/// let callback = verify_callback(&config, body.as_bytes()).unwrap();
/// assert_eq!(callback.account_id, "u1");
/// ```
pub fn verify_callback(
    config: &ContextIoConfig,
    body: &[u8],
) -> Result<WebhookCallback, WebhookError> {
    let callback: WebhookCallback = serde_json::from_slice(body)?;

    if !verify_signature(
        callback.timestamp,
        &callback.token,
        &callback.signature,
        config.consumer_secret().as_ref(),
    ) {
        tracing::debug!(webhook_id = %callback.webhook_id, "Rejected webhook callback");
        return Err(WebhookError::InvalidSignature);
    }

    Ok(callback)
}
