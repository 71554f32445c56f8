//! The SDK entry point.

use std::sync::Arc;

use crate::clients::{HttpClient, Transport};
use crate::config::ContextIoConfig;
use crate::error::ConfigError;
use crate::rest::resources::lite::{associations, url_builder, UserCollection};
use crate::rest::Api;

/// A configured Context.IO Lite client.
///
/// Holds the shared [`Api`] handle (transport plus registries) and hands out
/// the root [`UserCollection`]. Cloning is cheap.
///
/// # Example
///
/// ```rust,ignore
/// use contextio_lite::{ContextIo, ContextIoConfig};
/// use contextio_lite::rest::RestCollection;
///
/// let contextio = ContextIo::new(ContextIoConfig::from_env()?)?;
///
/// for user in contextio.users().to_vec().await? {
///     println!("{:?}", user.email_addresses().await?);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ContextIo {
    api: Api,
}

impl ContextIo {
    /// Builds a client signing requests with the config's credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportInitialization`] if the HTTP client
    /// cannot be built.
    pub fn new(config: ContextIoConfig) -> Result<Self, ConfigError> {
        let client = HttpClient::new(&config)?;
        tracing::debug!(
            base_url = %config.base_url(),
            version = %config.api_version(),
            "Context.IO client ready"
        );
        Ok(Self::with_transport(Arc::new(client)))
    }

    /// Builds a client over any [`Transport`], e.g. a test double.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            api: Api::new(transport, associations(), url_builder()),
        }
    }

    /// The root collection of users.
    #[must_use]
    pub fn users(&self) -> UserCollection {
        UserCollection::root(&self.api)
    }

    /// The shared handle every resource and collection carries.
    #[must_use]
    pub const fn api(&self) -> &Api {
        &self.api
    }
}
