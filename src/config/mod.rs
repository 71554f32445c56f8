//! Configuration types for the Context.IO Lite SDK.
//!
//! This module provides the core configuration types used to initialize
//! the SDK for API communication with Context.IO.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ContextIoConfig`]: The main configuration struct holding all SDK settings
//! - [`ContextIoConfigBuilder`]: A builder for constructing [`ContextIoConfig`] instances
//! - [`ConsumerKey`]: A validated OAuth consumer key newtype
//! - [`ConsumerSecret`]: A validated OAuth consumer secret with masked debug output
//! - [`BaseUrl`]: A validated API host URL
//! - [`ApiVersion`]: The API version segment to use
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use contextio_lite::{ContextIoConfig, ConsumerKey, ConsumerSecret};
//!
//! let config = ContextIoConfig::builder()
//!     .consumer_key(ConsumerKey::new("my-key").unwrap())
//!     .consumer_secret(ConsumerSecret::new("my-secret").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;
mod version;

pub use newtypes::{BaseUrl, ConsumerKey, ConsumerSecret, DEFAULT_BASE_URL};
pub use version::ApiVersion;

use std::env;
use std::time::Duration;

use crate::auth::SignatureMethod;
use crate::error::ConfigError;

/// Environment variable holding the OAuth consumer key.
pub const ENV_CONSUMER_KEY: &str = "CONTEXTIO_CONSUMER_KEY";
/// Environment variable holding the OAuth consumer secret.
pub const ENV_CONSUMER_SECRET: &str = "CONTEXTIO_CONSUMER_SECRET";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "CONTEXTIO_BASE_URL";

/// Configuration for the Context.IO Lite SDK.
///
/// `ContextIoConfig` is `Clone`, `Send`, and `Sync`, so one configuration
/// can back many clients.
///
/// # Example
///
/// ```rust
/// use contextio_lite::{ContextIoConfig, ConsumerKey, ConsumerSecret, ApiVersion};
///
/// let config = ContextIoConfig::builder()
///     .consumer_key(ConsumerKey::new("key").unwrap())
///     .consumer_secret(ConsumerSecret::new("secret").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.api_version(), &ApiVersion::Lite);
/// ```
#[derive(Clone, Debug)]
pub struct ContextIoConfig {
    consumer_key: ConsumerKey,
    consumer_secret: ConsumerSecret,
    base_url: BaseUrl,
    api_version: ApiVersion,
    timeout: Option<Duration>,
    open_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
    signature_method: SignatureMethod,
}

impl ContextIoConfig {
    /// Creates a new builder for constructing a `ContextIoConfig`.
    #[must_use]
    pub fn builder() -> ContextIoConfigBuilder {
        ContextIoConfigBuilder::new()
    }

    /// Builds a configuration from `CONTEXTIO_CONSUMER_KEY`,
    /// `CONTEXTIO_CONSUMER_SECRET` and the optional `CONTEXTIO_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvironmentVariable`] if the key or the
    /// secret is not set, or a validation error for malformed values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key = env::var(ENV_CONSUMER_KEY).map_err(|_| {
            ConfigError::MissingEnvironmentVariable {
                name: ENV_CONSUMER_KEY,
            }
        })?;
        let secret = env::var(ENV_CONSUMER_SECRET).map_err(|_| {
            ConfigError::MissingEnvironmentVariable {
                name: ENV_CONSUMER_SECRET,
            }
        })?;

        let mut builder = Self::builder()
            .consumer_key(ConsumerKey::new(key)?)
            .consumer_secret(ConsumerSecret::new(secret)?);

        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            builder = builder.base_url(BaseUrl::new(base_url)?);
        }

        builder.build()
    }

    /// Returns the OAuth consumer key.
    #[must_use]
    pub const fn consumer_key(&self) -> &ConsumerKey {
        &self.consumer_key
    }

    /// Returns the OAuth consumer secret.
    #[must_use]
    pub const fn consumer_secret(&self) -> &ConsumerSecret {
        &self.consumer_secret
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the overall request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the connection (open) timeout, if configured.
    #[must_use]
    pub const fn open_timeout(&self) -> Option<Duration> {
        self.open_timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the OAuth signature method.
    #[must_use]
    pub const fn signature_method(&self) -> SignatureMethod {
        self.signature_method
    }
}

// Verify ContextIoConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ContextIoConfig>();
};

/// Builder for constructing [`ContextIoConfig`] instances.
///
/// Required fields are `consumer_key` and `consumer_secret`.
///
/// # Defaults
///
/// - `base_url`: `https://api.context.io`
/// - `api_version`: `lite`
/// - `timeout` / `open_timeout`: `None` (transport defaults)
/// - `user_agent_prefix`: `None`
/// - `signature_method`: `HMAC-SHA1`
#[derive(Debug, Default)]
pub struct ContextIoConfigBuilder {
    consumer_key: Option<ConsumerKey>,
    consumer_secret: Option<ConsumerSecret>,
    base_url: Option<BaseUrl>,
    api_version: Option<ApiVersion>,
    timeout: Option<Duration>,
    open_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
    signature_method: Option<SignatureMethod>,
}

impl ContextIoConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the OAuth consumer key (required).
    #[must_use]
    pub fn consumer_key(mut self, key: ConsumerKey) -> Self {
        self.consumer_key = Some(key);
        self
    }

    /// Sets the OAuth consumer secret (required).
    #[must_use]
    pub fn consumer_secret(mut self, secret: ConsumerSecret) -> Self {
        self.consumer_secret = Some(secret);
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the overall request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection (open) timeout.
    #[must_use]
    pub const fn open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the OAuth signature method.
    #[must_use]
    pub const fn signature_method(mut self, method: SignatureMethod) -> Self {
        self.signature_method = Some(method);
        self
    }

    /// Builds the [`ContextIoConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `consumer_key` or
    /// `consumer_secret` are not set.
    pub fn build(self) -> Result<ContextIoConfig, ConfigError> {
        let consumer_key = self.consumer_key.ok_or(ConfigError::MissingRequiredField {
            field: "consumer_key",
        })?;
        let consumer_secret = self
            .consumer_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "consumer_secret",
            })?;

        Ok(ContextIoConfig {
            consumer_key,
            consumer_secret,
            base_url: self.base_url.unwrap_or_default(),
            api_version: self.api_version.unwrap_or_default(),
            timeout: self.timeout,
            open_timeout: self.open_timeout,
            user_agent_prefix: self.user_agent_prefix,
            signature_method: self.signature_method.unwrap_or_default(),
        })
    }
}
