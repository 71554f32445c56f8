//! HTTP client types for Context.IO API communication.
//!
//! This module provides the transport layer consumed by resources and
//! collections: request encoding, OAuth signing, status interpretation and
//! error message extraction.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Transport`]: The narrow contract resources are written against
//! - [`HttpClient`]: The signed reqwest implementation of [`Transport`]
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A response with status and raw body
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`Params`]: Request parameters
//!
//! # Example
//!
//! ```rust,ignore
//! use contextio_lite::clients::{HttpClient, HttpMethod, Params, Transport};
//!
//! let client = HttpClient::new(&config)?;
//! let users = client.request(HttpMethod::Get, "users", &Params::new()).await?;
//! ```
//!
//! # Retry Behavior
//!
//! Requests are never retried. Any status outside 200-399 surfaces as
//! [`HttpError::Response`].

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, Params};
pub use http_response::HttpResponse;
pub use transport::Transport;
