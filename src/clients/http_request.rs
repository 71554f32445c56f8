//! HTTP request types for the Context.IO Lite SDK.
//!
//! This module provides [`HttpMethod`], the [`Params`] map passed along with
//! every call, and the [`HttpRequest`] type with its builder.

use std::fmt;

use serde_json::Value;

use crate::clients::errors::InvalidHttpRequestError;

/// Request parameters: query string for GET/DELETE, form body for POST/PUT.
pub type Params = serde_json::Map<String, Value>;

/// HTTP methods used by the Context.IO API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating and updating resources.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case method name used on the wire and in signatures.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` if parameters travel in the request body.
    #[must_use]
    pub const fn sends_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to be sent to the Context.IO API.
///
/// # Example
///
/// ```rust
/// use contextio_lite::clients::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "users")
///     .param("email", "jane@example.com")
///     .param("include_flags", json!(1))
///     .build();
///
/// let pairs = request.encoded_params().unwrap();
/// assert_eq!(pairs[0], ("email".to_string(), "jane@example.com".to_string()));
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path, relative to the versioned base, or a full API URL.
    pub path: String,
    /// Parameters sent with the request.
    pub params: Params,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Flattens the parameters into string pairs.
    ///
    /// Sequence values are joined with commas into a single value rather than
    /// repeated keys. `null` becomes an empty value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::UnsupportedParamValue`] for nested
    /// objects, or arrays containing objects or arrays.
    pub fn encoded_params(&self) -> Result<Vec<(String, String)>, InvalidHttpRequestError> {
        self.params
            .iter()
            .map(|(key, value)| Ok((key.clone(), encode_value(key, value)?)))
            .collect()
    }
}

fn encode_scalar(key: &str, value: &Value) -> Result<String, InvalidHttpRequestError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Err(InvalidHttpRequestError::UnsupportedParamValue {
            key: key.to_string(),
        }),
    }
}

fn encode_value(key: &str, value: &Value) -> Result<String, InvalidHttpRequestError> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| encode_scalar(key, item))
            .collect::<Result<Vec<_>, _>>()?
            .join(",")),
        other => encode_scalar(key, other),
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    params: Params,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            params: Params::new(),
        }
    }

    /// Replaces all parameters at once.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Adds a single parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Builds the [`HttpRequest`].
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            http_method: self.http_method,
            path: self.path,
            params: self.params,
        }
    }
}
