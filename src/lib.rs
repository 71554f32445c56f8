//! # Context.IO Lite Rust SDK
//!
//! A Rust SDK for the Context.IO Lite email API, providing type-safe
//! configuration, OAuth 1.0a request signing and a lazily evaluated object
//! model of users, email accounts, folders, messages, attachments and
//! webhooks.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`ContextIoConfig`] and [`ContextIoConfigBuilder`]
//! - Validated newtypes for credentials and the API host
//! - A signed async HTTP transport ([`HttpClient`]) behind the [`Transport`] trait
//! - Resources and collections that fetch on first use and cache per instance
//! - Chainable `with`/`filter` constraints that never mutate their receiver
//! - Webhook callback verification via [`webhooks`]
//!
//! ## Quick Start
//!
//! ```rust
//! use contextio_lite::{ConsumerKey, ConsumerSecret, ContextIo, ContextIoConfig};
//!
//! let config = ContextIoConfig::builder()
//!     .consumer_key(ConsumerKey::new("your-key").unwrap())
//!     .consumer_secret(ConsumerSecret::new("your-secret").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let contextio = ContextIo::new(config).unwrap();
//! let users = contextio.users();
//! ```
//!
//! ## Walking the hierarchy
//!
//! Keyed access never touches the network; the first attribute read or
//! enumeration does, once.
//!
//! ```rust,ignore
//! use contextio_lite::rest::{RestCollection, RestResource};
//! use serde_json::json;
//!
//! let inbox = contextio
//!     .users()
//!     .get("4f1c8e2a")
//!     .email_accounts()?
//!     .get("jane::gmail")
//!     .folders()?
//!     .get("INBOX");
//!
//! // One GET for the list
//! for message in inbox.messages()?.to_vec().await? {
//!     println!("{:?}: {:?}", message.subject().await?, message.from().await?);
//! }
//! ```
//!
//! ## Error Handling
//!
//! - [`ConfigError`]: invalid configuration, raised at build time
//! - [`HttpError`]: transport failures and non-success statuses
//! - [`rest::ResourceError`]: everything a resource or collection can report,
//!   wrapping the two above
//!
//! ## Logging
//!
//! The SDK emits [`tracing`](https://docs.rs/tracing) events (`debug` for
//! requests and cache fills, `warn` for malformed bodies). No subscriber is
//! installed.
//!
//! ## Thread Safety
//!
//! Every public type is `Send + Sync`. Resources and collections are cheap
//! to clone and clones share their caches.

pub mod auth;
pub mod clients;
pub mod config;
mod contextio;
pub mod error;
pub mod rest;
pub mod webhooks;

// Re-export public types at crate root for convenience
pub use config::{
    ApiVersion, BaseUrl, ConsumerKey, ConsumerSecret, ContextIoConfig, ContextIoConfigBuilder,
};
pub use contextio::ContextIo;
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, Params, Transport,
};

// Re-export the resource traits, needed to call their methods
pub use rest::{ResourceError, RestCollection, RestResource};
