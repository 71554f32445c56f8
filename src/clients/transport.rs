//! The transport seam between resources and the network.
//!
//! Resources and collections never talk to reqwest directly. They go through
//! [`Transport`], which the signed [`HttpClient`](crate::clients::HttpClient)
//! implements and tests replace with scripted doubles.

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, Params};

/// Issues requests against the Context.IO API.
///
/// `path` is relative to `/<version>/`, or a full API URL whose
/// `<base>/<version>/` prefix is stripped.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and parses the JSON body.
    ///
    /// Empty or malformed bodies yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Response`] for statuses outside 200-399 and
    /// other [`HttpError`] variants for encoding or network failures.
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
    ) -> Result<Option<Value>, HttpError>;

    /// Sends a request and returns the unparsed body.
    ///
    /// # Errors
    ///
    /// Same as [`Transport::request`].
    async fn raw_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
    ) -> Result<Vec<u8>, HttpError>;
}
