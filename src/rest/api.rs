//! The shared handle resources and collections carry.
//!
//! An [`Api`] bundles the [`Transport`], the [`AssociationRegistry`] and the
//! [`UrlBuilder`]. It is cheap to clone; every resource and collection built
//! from one entry point shares the same handle.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::{HttpMethod, Params, Transport};
use crate::rest::registry::AssociationRegistry;
use crate::rest::url_builder::{UrlBuilder, UrlTarget};
use crate::rest::ResourceError;

/// Handle on the transport and the registries.
///
/// # Example
///
/// ```rust,ignore
/// use contextio_lite::rest::Api;
/// use contextio_lite::rest::resources::lite;
///
/// let api = Api::new(transport, lite::associations(), lite::url_builder());
/// let users = lite::UserCollection::root(&api);
/// ```
#[derive(Clone)]
pub struct Api {
    inner: Arc<ApiInner>,
}

struct ApiInner {
    transport: Arc<dyn Transport>,
    associations: AssociationRegistry,
    urls: UrlBuilder,
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("associations", &self.inner.associations.len())
            .field("urls", &self.inner.urls.len())
            .finish_non_exhaustive()
    }
}

impl Api {
    /// Creates a handle from a transport and fully populated registries.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        associations: AssociationRegistry,
        urls: UrlBuilder,
    ) -> Self {
        Self {
            inner: Arc::new(ApiInner {
                transport,
                associations,
                urls,
            }),
        }
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    /// Returns the association registry.
    #[must_use]
    pub fn associations(&self) -> &AssociationRegistry {
        &self.inner.associations
    }

    /// Returns the URL builder.
    #[must_use]
    pub fn urls(&self) -> &UrlBuilder {
        &self.inner.urls
    }

    /// Computes the path for a resource or collection.
    ///
    /// # Errors
    ///
    /// See [`UrlBuilder::url_for`].
    pub fn url_for(&self, target: UrlTarget<'_>) -> Result<String, ResourceError> {
        self.inner.urls.url_for(target)
    }

    /// Sends a request and returns the parsed body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the transport fails.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
    ) -> Result<Option<Value>, ResourceError> {
        tracing::debug!(method = %method, path, "Issuing API request");
        Ok(self.inner.transport.request(method, path, params).await?)
    }

    /// Sends a request and returns the unparsed body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the transport fails.
    pub async fn raw_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
    ) -> Result<Vec<u8>, ResourceError> {
        tracing::debug!(method = %method, path, "Issuing raw API request");
        Ok(self.inner.transport.raw_request(method, path, params).await?)
    }
}

/// Reads the `success` flag of a response body; absent or malformed is `false`.
#[must_use]
pub fn success_flag(body: Option<&Value>) -> bool {
    body.and_then(|body| body.get("success"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

// Verify Api is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Api>();
};
