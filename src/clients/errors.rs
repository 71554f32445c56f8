//! HTTP-specific error types for the Context.IO Lite SDK.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: A response outside the 200-399 range
//! - [`InvalidHttpRequestError`]: A request that cannot be encoded or signed
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use contextio_lite::clients::HttpError;
//!
//! match transport.request(HttpMethod::Get, "users", &Params::new()).await {
//!     Ok(body) => println!("Body: {body:?}"),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::auth::SigningError;

/// Error returned when the API responds with a status outside 200-399.
///
/// The message is the best-effort text extracted from the response body,
/// falling back to `HTTP <status> Error`.
///
/// # Example
///
/// ```rust
/// use contextio_lite::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 401,
///     message: "bad key".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "bad key");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human-readable message extracted from the response.
    pub message: String,
}

/// Error returned when a request cannot be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A parameter value has no flat string encoding (e.g., a nested object).
    #[error("Parameter '{key}' cannot be encoded; only scalars and arrays of scalars are supported.")]
    UnsupportedParamValue {
        /// The offending parameter name.
        key: String,
    },

    /// The request could not be signed.
    #[error("Failed to sign request: {0}")]
    Signing(#[from] SigningError),
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (status outside 200-399).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request construction failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the response status code, if the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_displays_message_verbatim() {
        let error = HttpResponseError {
            code: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(error.to_string(), "bad key");
    }

    #[test]
    fn test_http_error_is_transparent_over_response() {
        let error = HttpError::from(HttpResponseError {
            code: 404,
            message: "HTTP 404 Error".to_string(),
        });
        assert_eq!(error.to_string(), "HTTP 404 Error");
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_unsupported_param_value_names_key() {
        let error = InvalidHttpRequestError::UnsupportedParamValue {
            key: "filter".to_string(),
        };
        assert!(error.to_string().contains("'filter'"));
        assert_eq!(HttpError::from(error).status(), None);
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let response: &dyn std::error::Error = &HttpResponseError {
            code: 400,
            message: "test".to_string(),
        };
        let _ = response;

        let invalid: &dyn std::error::Error =
            &InvalidHttpRequestError::Signing(SigningError::InvalidKeyLength);
        let _ = invalid;
    }
}
