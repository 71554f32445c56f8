//! Signed HTTP client for Context.IO API communication.
//!
//! This module provides the [`HttpClient`] type, the reqwest-backed
//! [`Transport`] that signs every request with OAuth 1.0a.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::OAuthSigner;
use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::clients::http_request::{HttpMethod, HttpRequest, Params};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::Transport;
use crate::config::ContextIoConfig;
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making signed requests to the Context.IO API.
///
/// The client handles:
/// - URL construction as `<base>/<version>/<path>`
/// - Default headers including User-Agent
/// - OAuth 1.0a signing of every request
/// - Status interpretation and error message extraction
///
/// Requests are never retried.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use contextio_lite::{ContextIoConfig, ConsumerKey, ConsumerSecret};
/// use contextio_lite::clients::HttpClient;
///
/// let config = ContextIoConfig::builder()
///     .consumer_key(ConsumerKey::new("key").unwrap())
///     .consumer_secret(ConsumerSecret::new("secret").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config).unwrap();
/// assert_eq!(client.url_for("users"), "https://api.context.io/lite/users");
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL (e.g., `https://api.context.io`).
    base_url: String,
    /// API version segment (e.g., `lite`).
    version: String,
    /// Request signer holding the consumer credentials.
    signer: OAuthSigner,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportInitialization`] if the underlying
    /// reqwest client cannot be created (e.g., TLS initialization failure).
    pub fn new(config: &ContextIoConfig) -> Result<Self, ConfigError> {
        // Build User-Agent header
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}contextio-lite-rust-{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(open_timeout) = config.open_timeout() {
            builder = builder.connect_timeout(open_timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::TransportInitialization {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().as_ref().to_string(),
            version: config.api_version().as_str().to_string(),
            signer: OAuthSigner::new(
                config.consumer_key(),
                config.consumer_secret(),
                config.signature_method(),
            ),
            default_headers,
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the API version segment for this client.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Resolves a path to the full request URL.
    ///
    /// Full URLs beginning with `<base>/<version>/` are reduced to their path
    /// first, so resource URLs returned by the API can be passed back as-is.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let prefix = format!("{}/{}/", self.base_url, self.version);
        let path = path.strip_prefix(&prefix).unwrap_or(path);
        format!("{prefix}{}", path.trim_start_matches('/'))
    }

    /// Signs and sends a request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Parameters cannot be encoded or signed (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - A status outside 200-399 is received (`Response`)
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.send_with_accept(request, None).await
    }

    async fn send_with_accept(
        &self,
        request: HttpRequest,
        accept: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        let url = self.url_for(&request.path);
        let pairs = request.encoded_params()?;
        let method = request.http_method;

        let authorization = self
            .signer
            .authorization_header(method.as_str(), &url, &pairs)
            .map_err(InvalidHttpRequestError::from)?;

        tracing::debug!(method = %method, url = %url, "Sending Context.IO request");

        let mut req_builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(accept) = accept {
            req_builder = req_builder.header("Accept", accept);
        }
        req_builder = req_builder.header("Authorization", authorization);

        if method.sends_body() {
            req_builder = req_builder.form(&pairs);
        } else if !pairs.is_empty() {
            req_builder = req_builder.query(&pairs);
        }

        let res = req_builder.send().await?;
        let code = res.status().as_u16();
        let body = res.bytes().await?.to_vec();
        let response = HttpResponse::new(code, body);

        if response.is_ok() {
            return Ok(response);
        }

        let message = response.error_message();
        tracing::debug!(status = code, message = %message, "Context.IO request failed");
        Err(HttpError::Response(HttpResponseError { code, message }))
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
    ) -> Result<Option<Value>, HttpError> {
        let request = HttpRequest::builder(method, path)
            .params(params.clone())
            .build();
        let response = self
            .send_with_accept(request, Some("application/json"))
            .await?;
        Ok(response.json())
    }

    async fn raw_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
    ) -> Result<Vec<u8>, HttpError> {
        let request = HttpRequest::builder(method, path)
            .params(params.clone())
            .build();
        Ok(self.send(request).await?.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseUrl, ConsumerKey, ConsumerSecret};

    fn create_test_config() -> ContextIoConfig {
        ContextIoConfig::builder()
            .consumer_key(ConsumerKey::new("test-key").unwrap())
            .consumer_secret(ConsumerSecret::new("test-secret").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction_uses_config() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        assert_eq!(client.base_url(), "https://api.context.io");
        assert_eq!(client.version(), "lite");
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert_eq!(user_agent, &format!("contextio-lite-rust-{SDK_VERSION}"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ContextIoConfig::builder()
            .consumer_key(ConsumerKey::new("test-key").unwrap())
            .consumer_secret(ConsumerSecret::new("test-secret").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("contextio-lite-rust-"));
    }

    #[test]
    fn test_url_for_relative_path() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        assert_eq!(
            client.url_for("users/u1/email_accounts"),
            "https://api.context.io/lite/users/u1/email_accounts"
        );
        assert_eq!(
            client.url_for("/users"),
            "https://api.context.io/lite/users"
        );
    }

    #[test]
    fn test_url_for_strips_full_api_url() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        assert_eq!(
            client.url_for("https://api.context.io/lite/users/u1"),
            "https://api.context.io/lite/users/u1"
        );
    }

    #[test]
    fn test_url_for_custom_base_url() {
        let config = ContextIoConfig::builder()
            .consumer_key(ConsumerKey::new("test-key").unwrap())
            .consumer_secret(ConsumerSecret::new("test-secret").unwrap())
            .base_url(BaseUrl::new("http://127.0.0.1:4000/").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        assert_eq!(client.url_for("users"), "http://127.0.0.1:4000/lite/users");
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
