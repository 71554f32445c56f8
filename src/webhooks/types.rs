//! Webhook callback payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON body Context.IO POSTs to a webhook's `callback_url`.
///
/// # Example
///
/// ```rust
/// use contextio_lite::webhooks::WebhookCallback;
///
/// let callback: WebhookCallback = serde_json::from_str(r#"{
///     "account_id": "u1",
///     "webhook_id": "w1",
///     "token": "abc123",
///     "signature": "deadbeef",
///     "timestamp": 1400000000
/// }"#).unwrap();
///
/// assert_eq!(callback.webhook_id, "w1");
/// assert!(callback.message_data.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebhookCallback {
    /// Id of the user the webhook belongs to.
    pub account_id: String,
    /// Id of the webhook that fired.
    pub webhook_id: String,
    /// Random token, part of the signed message.
    pub token: String,
    /// Hex HMAC-SHA256 of `timestamp + token`.
    pub signature: String,
    /// UNIX time of the delivery, part of the signed message.
    pub timestamp: i64,
    /// The matching message, when the webhook includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_data: Option<Value>,
}
