//! Context.IO API version definitions.
//!
//! Requests are addressed as `/<version>/<path>`. The Lite API lives under
//! the `lite` version segment.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Context.IO API version.
///
/// # Example
///
/// ```rust
/// use contextio_lite::ApiVersion;
///
/// let version = ApiVersion::lite();
/// assert_eq!(version.to_string(), "lite");
///
/// let version: ApiVersion = "2.0".parse().unwrap();
/// assert_eq!(version.as_str(), "2.0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// The Lite API.
    Lite,
    /// Any other version segment.
    Custom(String),
}

impl ApiVersion {
    /// Returns the Lite API version, the one this crate models.
    #[must_use]
    pub const fn lite() -> Self {
        Self::Lite
    }

    /// Returns the path segment for this version.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Lite => "lite",
            Self::Custom(version) => version,
        }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::lite()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        if trimmed.is_empty() || trimmed.contains(['/', '?', '#', ' ']) {
            return Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            });
        }

        if trimmed.eq_ignore_ascii_case("lite") {
            Ok(Self::Lite)
        } else {
            Ok(Self::Custom(trimmed.to_string()))
        }
    }
}
