//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// The default Context.IO API host.
pub const DEFAULT_BASE_URL: &str = "https://api.context.io";

/// A validated OAuth consumer key.
///
/// # Example
///
/// ```rust
/// use contextio_lite::ConsumerKey;
///
/// let key = ConsumerKey::new("my-consumer-key").unwrap();
/// assert_eq!(key.as_ref(), "my-consumer-key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumerKey(String);

impl ConsumerKey {
    /// Creates a new validated consumer key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyConsumerKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyConsumerKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ConsumerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated OAuth consumer secret.
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ConsumerSecret(*****)` instead of the actual secret.
///
/// # Example
///
/// ```rust
/// use contextio_lite::ConsumerSecret;
///
/// let secret = ConsumerSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ConsumerSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerSecret(String);

impl ConsumerSecret {
    /// Creates a new validated consumer secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyConsumerSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyConsumerSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ConsumerSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConsumerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConsumerSecret(*****)")
    }
}

/// A validated API base URL, such as `https://api.context.io`.
///
/// The scheme must be `http` or `https` and a host must be present. Any
/// trailing slash is removed so paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use contextio_lite::BaseUrl;
///
/// let url = BaseUrl::new("https://api.context.io/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.context.io");
/// assert_eq!(url.scheme(), "https");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no host or
    /// does not use the `http` or `https` scheme.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let url = raw.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: raw.clone() })?;

        let scheme = url[..scheme_end].to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidBaseUrl { url: raw });
        }

        let host = &url[scheme_end + 3..];
        let host = host.find(['/', '?', '#']).map_or(host, |i| &host[..i]);
        if host.is_empty() || host.starts_with(':') {
            return Err(ConfigError::InvalidBaseUrl { url: raw });
        }

        Ok(Self { url, scheme_end })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            url: DEFAULT_BASE_URL.to_string(),
            scheme_end: 5,
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_key_rejects_empty() {
        assert!(matches!(
            ConsumerKey::new(""),
            Err(ConfigError::EmptyConsumerKey)
        ));
    }

    #[test]
    fn test_consumer_secret_rejects_empty() {
        assert!(matches!(
            ConsumerSecret::new(""),
            Err(ConfigError::EmptyConsumerSecret)
        ));
    }

    #[test]
    fn test_consumer_secret_debug_is_masked() {
        let secret = ConsumerSecret::new("super-secret").unwrap();
        let debug = format!("{secret:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(debug, "ConsumerSecret(*****)");
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let url = BaseUrl::new("https://api.context.io/").unwrap();
        assert_eq!(url.as_ref(), "https://api.context.io");
    }

    #[test]
    fn test_base_url_accepts_port() {
        let url = BaseUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.as_ref(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert!(matches!(
            BaseUrl::new("ftp://api.context.io"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_base_url_rejects_missing_host() {
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("api.context.io").is_err());
    }

    #[test]
    fn test_default_base_url() {
        let url = BaseUrl::default();
        assert_eq!(url.as_ref(), DEFAULT_BASE_URL);
        assert_eq!(url.scheme(), "https");
    }
}
