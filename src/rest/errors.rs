//! Resource-specific error types.
//!
//! This module contains the error type returned by resources, collections
//! and the URL builder. It layers configuration-class failures (a resource
//! that cannot be addressed, a type with no URL rule) and domain validation
//! over the transport's [`HttpError`].
//!
//! # Error Handling
//!
//! - [`ResourceError::MissingIdentity`]: neither `resource_url` nor the primary key was supplied
//! - [`ResourceError::UnregisteredUrl`]: no URL rule exists for the type
//! - [`ResourceError::UnregisteredAssociation`]: an association name has no registered type
//! - [`ResourceError::MissingAssociation`]: a parent needed to build a URL is absent
//! - [`ResourceError::Validation`]: arguments rejected before any request is sent
//! - [`ResourceError::Http`]: the transport failed or the API returned an error status
//!
//! # Example
//!
//! ```rust,ignore
//! use contextio_lite::rest::ResourceError;
//!
//! match users.create(None, Params::new()).await {
//!     Ok(user) => println!("Created {:?}", user.resource_url()),
//!     Err(ResourceError::Validation { message, .. }) => println!("Rejected: {message}"),
//!     Err(ResourceError::Http(e)) => println!("API error: {e}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use crate::clients::HttpError;
use crate::error::ConfigError;
use thiserror::Error;

/// Error type for resource and collection operations.
///
/// # Example
///
/// ```rust
/// use contextio_lite::rest::ResourceError;
///
/// let error = ResourceError::MissingIdentity {
///     resource: "email_account",
///     primary_key: "label",
/// };
/// assert!(error.to_string().contains("resource_url or label"));
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource was constructed without an explicit URL or its primary key.
    #[error("Required option missing for {resource}. Make sure you have either resource_url or {primary_key}.")]
    MissingIdentity {
        /// The association name of the resource type (e.g., "user").
        resource: &'static str,
        /// The primary key that was expected.
        primary_key: &'static str,
    },

    /// No URL rule is registered for the type.
    #[error("URL could not be built for unregistered type: {resource}.")]
    UnregisteredUrl {
        /// The association name of the resource or collection type.
        resource: &'static str,
    },

    /// No type is registered under the association name.
    #[error("No resource or collection is registered for association '{name}'.")]
    UnregisteredAssociation {
        /// The association name that failed to resolve.
        name: String,
    },

    /// A parent association needed to build the URL is absent.
    #[error("Cannot build the URL for {resource} without its {association}.")]
    MissingAssociation {
        /// The association name of the type whose URL was requested.
        resource: &'static str,
        /// The missing parent association.
        association: &'static str,
    },

    /// Arguments were rejected before any request was sent.
    #[error("{message}")]
    Validation {
        /// The association name of the type being validated.
        resource: &'static str,
        /// What was wrong.
        message: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A configuration error occurred.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ResourceError {
    /// Returns `true` for errors caused by how the resource was declared or
    /// constructed, which retrying cannot fix.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingIdentity { .. }
                | Self::UnregisteredUrl { .. }
                | Self::UnregisteredAssociation { .. }
                | Self::MissingAssociation { .. }
                | Self::Config(_)
        )
    }

    /// Returns the HTTP status code for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;

    #[test]
    fn test_missing_identity_names_primary_key() {
        let error = ResourceError::MissingIdentity {
            resource: "folder",
            primary_key: "name",
        };
        let message = error.to_string();

        assert!(message.contains("folder"));
        assert!(message.contains("resource_url or name"));
        assert!(error.is_configuration());
    }

    #[test]
    fn test_unregistered_url_names_type() {
        let error = ResourceError::UnregisteredUrl {
            resource: "widgets",
        };
        assert!(error.to_string().contains("widgets"));
        assert!(error.is_configuration());
    }

    #[test]
    fn test_missing_association_includes_context() {
        let error = ResourceError::MissingAssociation {
            resource: "folder",
            association: "email_account",
        };
        let message = error.to_string();

        assert!(message.contains("folder"));
        assert!(message.contains("email_account"));
    }

    #[test]
    fn test_validation_displays_message_only() {
        let error = ResourceError::Validation {
            resource: "user",
            message: "You must provide an email for new Users.".to_string(),
        };
        assert_eq!(error.to_string(), "You must provide an email for new Users.");
        assert!(!error.is_configuration());
    }

    #[test]
    fn test_http_error_is_transparent() {
        let resource_error: ResourceError = HttpError::Response(HttpResponseError {
            code: 401,
            message: "bad key".to_string(),
        })
        .into();

        assert_eq!(resource_error.to_string(), "bad key");
        assert_eq!(resource_error.status(), Some(401));
        assert!(!resource_error.is_configuration());
    }

    #[test]
    fn test_from_config_error_conversion() {
        let resource_error: ResourceError = ConfigError::EmptyConsumerKey.into();
        assert!(matches!(resource_error, ResourceError::Config(_)));
        assert!(resource_error.is_configuration());
    }
}
