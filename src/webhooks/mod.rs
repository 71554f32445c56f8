//! Verification of Context.IO webhook callbacks.
//!
//! When a message matches a [`Webhook`](crate::rest::resources::lite::Webhook),
//! Context.IO POSTs a JSON payload to its `callback_url`. The payload is
//! signed with the application's consumer secret:
//!
//! ```text
//! signature = hex(HMAC-SHA256(key = consumer secret, message = timestamp + token))
//! ```
//!
//! # Overview
//!
//! - [`WebhookCallback`]: The deserialized callback payload
//! - [`verify_callback`]: Parses a raw body and checks its signature
//! - [`verify_signature`]: Low-level check for custom integrations
//! - [`WebhookError`]: Error types for verification
//!
//! # Example
//!
//! ```rust
//! use contextio_lite::auth::hmac::compute_hex_sha256;
//! use contextio_lite::webhooks::verify_signature;
//!
//! let signature = compute_hex_sha256("1400000000abc123", "secret").unwrap();
//! assert!(verify_signature(1_400_000_000, "abc123", &signature, "secret"));
//! assert!(!verify_signature(1_400_000_000, "abc123", "forged", "secret"));
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are `Send + Sync`.

mod errors;
mod types;
mod verification;

pub use errors::WebhookError;
pub use types::WebhookCallback;
pub use verification::{verify_callback, verify_signature};
