//! Webhook-specific error types for the Context.IO Lite SDK.
//!
//! - [`WebhookError::MalformedPayload`]: The body is not a callback payload
//! - [`WebhookError::InvalidSignature`]: The signature does not match
//!
//! # Example
//!
//! ```rust
//! use contextio_lite::webhooks::WebhookError;
//!
//! let error = WebhookError::InvalidSignature;
//! assert_eq!(error.to_string(), "Webhook signature verification failed");
//! ```

use thiserror::Error;

/// Error type for webhook callback verification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The callback body could not be parsed.
    #[error("Webhook payload is malformed: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The signature does not match the consumer secret.
    ///
    /// The message is generic to avoid leaking verification details.
    #[error("Webhook signature verification failed")]
    InvalidSignature,
}
