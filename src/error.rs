//! Error types for the Context.IO Lite SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use contextio_lite::{ConsumerKey, ConfigError};
//!
//! let result = ConsumerKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyConsumerKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Consumer key cannot be empty.
    #[error("OAuth consumer key cannot be empty. Please provide your Context.IO consumer key.")]
    EmptyConsumerKey,

    /// Consumer secret cannot be empty.
    #[error(
        "OAuth consumer secret cannot be empty. Please provide your Context.IO consumer secret."
    )]
    EmptyConsumerSecret,

    /// API version is missing or malformed.
    #[error("Invalid API version '{version}'. Expected a single path segment such as 'lite'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an http or https URL (e.g., 'https://api.context.io').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is not set.
    #[error("Environment variable '{name}' is not set.")]
    MissingEnvironmentVariable {
        /// The name of the variable.
        name: &'static str,
    },

    /// The HTTP transport could not be initialized.
    #[error("Failed to initialize HTTP transport: {reason}")]
    TransportInitialization {
        /// Why the transport could not be built.
        reason: String,
    },
}
