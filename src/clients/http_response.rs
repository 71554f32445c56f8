//! HTTP response types for the Context.IO Lite SDK.
//!
//! This module provides the [`HttpResponse`] type, which interprets status
//! codes and extracts error messages from Context.IO response bodies.

use serde_json::Value;

/// A response received from the Context.IO API.
///
/// # Example
///
/// ```rust
/// use contextio_lite::clients::HttpResponse;
///
/// let response = HttpResponse::new(401, br#"{"type":"error","value":"bad key"}"#.to_vec());
/// assert!(!response.is_ok());
/// assert_eq!(response.error_message(), "bad key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(code: u16, body: Vec<u8>) -> Self {
        Self { code, body }
    }

    /// Returns `true` for statuses in the 200-399 range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 399
    }

    /// Parses the body as JSON.
    ///
    /// Empty and malformed bodies yield `None` rather than an error.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }

    /// Extracts the most specific error message the body offers.
    ///
    /// - `{"type": "error", "value": ...}` yields `value`
    /// - `{"success": false, ...}` yields `feedback_code` and `connectionLog`
    ///   joined by a newline
    /// - anything else yields `HTTP <status> Error`
    #[must_use]
    pub fn error_message(&self) -> String {
        self.json()
            .as_ref()
            .and_then(extract_error_message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| format!("HTTP {} Error", self.code))
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn extract_error_message(body: &Value) -> Option<String> {
    if body.get("type").and_then(Value::as_str) == Some("error") {
        return body.get("value").and_then(value_text);
    }

    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let parts: Vec<String> = ["feedback_code", "connectionLog"]
            .iter()
            .filter_map(|key| body.get(*key).and_then(value_text))
            .collect();
        return Some(parts.join("\n"));
    }

    None
}
