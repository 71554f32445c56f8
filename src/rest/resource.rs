//! The generic single-entity engine.
//!
//! A [`Resource`] is one remote entity described by a static
//! [`ResourceSchema`]. It knows the attributes it was built with, fetches the
//! full attribute map on first demand (at most once), and materializes its
//! associations lazily:
//!
//! - **belongs-to**: the parent it was built under, or a resource built from
//!   the nested attribute map the server returned
//! - **has-many**: a [`Collection`] scoped to this resource, pre-seeded when
//!   the attributes already carry the child records
//!
//! Typed wrappers (see [`resources::lite`](crate::rest::resources::lite))
//! implement [`RestResource`] on top of this engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use contextio_lite::rest::RestResource;
//!
//! let user = contextio.users().get("u1");
//!
//! // No request yet; this triggers the single detail fetch
//! let first_name = user.first_name().await?;
//!
//! // Served from the cached attribute map
//! let anything = user.attribute("some_new_field").await?;
//! ```

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::clients::{HttpMethod, Params};
use crate::rest::api::{success_flag, Api};
use crate::rest::collection::{records_from, Collection, CollectionOptions};
use crate::rest::schema::{merge_constraints, normalize_attributes, Attributes, ResourceSchema};
use crate::rest::url_builder::UrlTarget;
use crate::rest::ResourceError;

/// Attribute that overrides URL computation when present.
pub const RESOURCE_URL: &str = "resource_url";

/// Construction options for a [`Resource`].
#[derive(Clone, Debug, Default)]
pub struct ResourceOptions {
    attributes: Attributes,
    parent: Option<Resource>,
    with: Params,
}

impl ResourceOptions {
    /// Starts from the known attributes of the resource.
    #[must_use]
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Sets the parent the resource is scoped under.
    #[must_use]
    pub fn parent(mut self, parent: Option<Resource>) -> Self {
        self.parent = parent;
        self
    }

    /// Sets the constraints passed with the detail fetch.
    #[must_use]
    pub fn with(mut self, constraints: Params) -> Self {
        self.with = constraints;
        self
    }
}

/// A single remote entity.
///
/// Cloning is cheap and clones share every cache. [`Resource::with`] builds
/// an independent instance instead.
#[derive(Clone)]
pub struct Resource {
    inner: Arc<ResourceInner>,
}

struct ResourceInner {
    api: Api,
    schema: &'static ResourceSchema,
    known: RwLock<Attributes>,
    parent: Option<Resource>,
    with_constraints: Params,
    resource_url: OnceLock<String>,
    api_attributes: OnceCell<Attributes>,
    belongs_to: HashMap<&'static str, OnceCell<Option<Resource>>>,
    has_many: HashMap<&'static str, Arc<OnceCell<Vec<Attributes>>>>,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("schema", &self.inner.schema.name)
            .field("known", &self.known_attributes())
            .field("with", &self.inner.with_constraints)
            .field("parent", &self.inner.parent.as_ref().map(|p| p.schema().name))
            .finish_non_exhaustive()
    }
}

impl Resource {
    /// Builds a resource.
    ///
    /// The attributes must carry either `resource_url` or the schema's
    /// primary key. Keys are normalized (`-` becomes `_`). An array under a
    /// declared has-many name seeds that association's collection and is
    /// removed from the plain attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingIdentity`] if neither identity is
    /// present.
    pub fn new(
        api: Api,
        schema: &'static ResourceSchema,
        options: ResourceOptions,
    ) -> Result<Self, ResourceError> {
        let attributes = normalize_attributes(options.attributes);

        let identified = [RESOURCE_URL, schema.primary_key]
            .iter()
            .any(|key| attributes.get(*key).is_some_and(|value| !value.is_null()));
        if !identified {
            return Err(ResourceError::MissingIdentity {
                resource: schema.name,
                primary_key: schema.primary_key,
            });
        }

        Ok(Self::build(
            api,
            schema,
            attributes,
            options.parent,
            options.with,
        ))
    }

    /// Builds a resource without checking its identity. A missing key
    /// surfaces later, when the URL is built.
    pub(crate) fn unchecked(
        api: Api,
        schema: &'static ResourceSchema,
        options: ResourceOptions,
    ) -> Self {
        Self::build(
            api,
            schema,
            normalize_attributes(options.attributes),
            options.parent,
            options.with,
        )
    }

    fn build(
        api: Api,
        schema: &'static ResourceSchema,
        mut attributes: Attributes,
        parent: Option<Self>,
        with_constraints: Params,
    ) -> Self {
        let has_many = schema
            .has_many
            .iter()
            .map(|name| {
                let seeded = match attributes.get(*name) {
                    Some(Value::Array(_)) => attributes
                        .remove(*name)
                        .map(|value| records_from(value, name)),
                    _ => None,
                };
                (*name, Arc::new(OnceCell::new_with(seeded)))
            })
            .collect();

        let belongs_to = schema
            .belongs_to
            .iter()
            .map(|name| (*name, OnceCell::new()))
            .collect();

        Self {
            inner: Arc::new(ResourceInner {
                api,
                schema,
                known: RwLock::new(attributes),
                parent,
                with_constraints,
                resource_url: OnceLock::new(),
                api_attributes: OnceCell::new(),
                belongs_to,
                has_many,
            }),
        }
    }

    /// Returns the API handle.
    #[must_use]
    pub fn api(&self) -> &Api {
        &self.inner.api
    }

    /// Returns the schema describing this resource's type.
    #[must_use]
    pub fn schema(&self) -> &'static ResourceSchema {
        self.inner.schema
    }

    /// Returns the name of the primary key field.
    #[must_use]
    pub fn primary_key(&self) -> &'static str {
        self.inner.schema.primary_key
    }

    /// Returns the parent this resource was built under, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.inner.parent.as_ref()
    }

    /// Returns the constraints sent with the detail fetch.
    #[must_use]
    pub fn with_constraints(&self) -> &Params {
        &self.inner.with_constraints
    }

    /// Returns a locally known attribute without touching the network.
    #[must_use]
    pub fn known(&self, field: &str) -> Option<Value> {
        self.inner
            .known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(field)
            .cloned()
    }

    /// Returns a snapshot of the locally known attributes.
    #[must_use]
    pub fn known_attributes(&self) -> Attributes {
        self.inner
            .known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Overwrites locally known attributes, e.g. after a successful update.
    pub(crate) fn merge_known(&self, attributes: Attributes) {
        self.inner
            .known
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(normalize_attributes(attributes));
    }

    /// Returns the path used to fetch and mutate this resource.
    ///
    /// An explicit `resource_url` attribute wins; otherwise the URL builder
    /// computes it from the primary key and the parent chain. The result is
    /// memoized.
    ///
    /// # Errors
    ///
    /// Returns a configuration-class [`ResourceError`] if the path cannot be
    /// built.
    pub fn resource_url(&self) -> Result<String, ResourceError> {
        if let Some(url) = self.inner.resource_url.get() {
            return Ok(url.clone());
        }

        let url = match self.known(RESOURCE_URL) {
            Some(Value::String(url)) if !url.is_empty() => url,
            _ => self.inner.api.url_for(UrlTarget::Resource(self))?,
        };

        Ok(self.inner.resource_url.get_or_init(|| url).clone())
    }

    /// Returns the full attribute map, fetching it on first call.
    ///
    /// The fetch is a GET to [`Resource::resource_url`] carrying the `with`
    /// constraints. A body that is not an object is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the URL cannot be built or the request
    /// fails. A failed fetch is not cached.
    pub async fn api_attributes(&self) -> Result<&Attributes, ResourceError> {
        self.inner
            .api_attributes
            .get_or_try_init(|| async {
                let url = self.resource_url()?;
                tracing::debug!(resource = self.schema().name, url = %url, "Fetching attributes");

                let body = self
                    .inner
                    .api
                    .request(HttpMethod::Get, &url, &self.inner.with_constraints)
                    .await?;

                Ok(match body {
                    Some(Value::Object(map)) => normalize_attributes(map),
                    other => {
                        tracing::warn!(
                            resource = self.schema().name,
                            body = ?other,
                            "Expected an attribute object; treating as empty"
                        );
                        Attributes::new()
                    }
                })
            })
            .await
    }

    /// Returns the attribute map if it has already been fetched.
    #[must_use]
    pub fn cached_attributes(&self) -> Option<&Attributes> {
        self.inner.api_attributes.get()
    }

    /// Reads a field, declared or not.
    ///
    /// A locally known value is returned as is (`null` reads as `None`);
    /// otherwise the field is looked up in [`Resource::api_attributes`].
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn attribute(&self, field: &str) -> Result<Option<Value>, ResourceError> {
        if let Some(value) = self.known(field) {
            return Ok(Some(value).filter(|value| !value.is_null()));
        }

        Ok(self
            .api_attributes()
            .await?
            .get(field)
            .filter(|value| !value.is_null())
            .cloned())
    }

    /// Reads a field and deserializes it.
    ///
    /// A value of the wrong shape reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn attribute_as<T: DeserializeOwned>(
        &self,
        field: &str,
    ) -> Result<Option<T>, ResourceError> {
        let Some(value) = self.attribute(field).await? else {
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(error) => {
                tracing::warn!(
                    resource = self.schema().name,
                    field,
                    error = %error,
                    "Attribute has an unexpected shape"
                );
                Ok(None)
            }
        }
    }

    /// Reads a field as text; numbers are rendered as their decimal form.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn text(&self, field: &str) -> Result<Option<String>, ResourceError> {
        Ok(self.attribute(field).await?.and_then(|value| match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }))
    }

    /// Reads a field as an unsigned integer, accepting numeric strings.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn unsigned(&self, field: &str) -> Result<Option<u64>, ResourceError> {
        Ok(self.attribute(field).await?.and_then(|value| match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }))
    }

    /// Reads a field as a UNIX timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>, ResourceError> {
        let seconds = self.attribute(field).await?.and_then(|value| match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        Ok(seconds.and_then(|seconds| DateTime::from_timestamp(seconds, 0)))
    }

    /// Returns the names of every field this resource can answer for:
    /// declared lazy attributes, known attributes and fetched attributes.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self
            .schema()
            .lazy_attributes
            .iter()
            .map(ToString::to_string)
            .collect();
        names.extend(self.known_attributes().keys().cloned());
        if let Some(fetched) = self.cached_attributes() {
            names.extend(fetched.keys().cloned());
        }
        names.into_iter().collect()
    }

    /// Returns a new instance with `constraints` layered over the current
    /// `with` constraints. Boolean values become `1`/`0`.
    ///
    /// The receiver is left untouched and the two instances share no caches.
    /// Child records already held for a has-many association are copied
    /// into the new instance.
    #[must_use]
    pub fn with(&self, constraints: Params) -> Self {
        let mut attributes = self.known_attributes();
        for (name, records) in &self.inner.has_many {
            if let Some(records) = records.get() {
                let nested = records.iter().cloned().map(Value::Object).collect();
                attributes.insert((*name).to_string(), Value::Array(nested));
            }
        }

        Self::build(
            self.inner.api.clone(),
            self.inner.schema,
            attributes,
            self.inner.parent.clone(),
            merge_constraints(&self.inner.with_constraints, constraints),
        )
    }

    /// Deletes the resource remotely and returns the server's `success` flag.
    ///
    /// Cached attributes are left as they are; the instance is stale
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the URL cannot be built or the request
    /// fails.
    pub async fn delete(&self) -> Result<bool, ResourceError> {
        let body = self.request(HttpMethod::Delete, "", &Params::new()).await?;
        Ok(success_flag(body.as_ref()))
    }

    /// Sends a request to `<resource_url><suffix>`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the URL cannot be built or the request
    /// fails.
    pub async fn request(
        &self,
        method: HttpMethod,
        suffix: &str,
        params: &Params,
    ) -> Result<Option<Value>, ResourceError> {
        let url = format!("{}{suffix}", self.resource_url()?);
        self.inner.api.request(method, &url, params).await
    }

    /// Sends a request to `<resource_url><suffix>` and returns the raw body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the URL cannot be built or the request
    /// fails.
    pub async fn raw_request(
        &self,
        method: HttpMethod,
        suffix: &str,
        params: &Params,
    ) -> Result<Vec<u8>, ResourceError> {
        let url = format!("{}{suffix}", self.resource_url()?);
        self.inner.api.raw_request(method, &url, params).await
    }

    /// Returns the related resource registered under `name`.
    ///
    /// The parent this resource was built under is returned directly.
    /// Otherwise the nested attribute map is read (locally known first, then
    /// from [`Resource::api_attributes`]) and wrapped once; a missing or
    /// empty map yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredAssociation`] if `name` is not a
    /// declared belongs-to association of this type or has no registered
    /// schema, or any error from fetching and building the resource.
    pub async fn belongs_to(&self, name: &str) -> Result<Option<Self>, ResourceError> {
        if let Some(parent) = self.parent().filter(|p| p.schema().name == name) {
            return Ok(Some(parent.clone()));
        }

        let (name, cell) = self.inner.belongs_to.get_key_value(name).ok_or_else(|| {
            ResourceError::UnregisteredAssociation {
                name: name.to_string(),
            }
        })?;

        cell.get_or_try_init(|| async {
            let schema = self.inner.api.associations().resource(name)?;

            let nested = match self.known(name) {
                Some(value) => Some(value),
                None => self.api_attributes().await?.get(*name).cloned(),
            };

            match nested {
                Some(Value::Object(attributes)) if !attributes.is_empty() => Self::new(
                    self.inner.api.clone(),
                    schema,
                    ResourceOptions::new(attributes),
                )
                .map(Some),
                _ => Ok(None),
            }
        })
        .await
        .cloned()
    }

    /// Returns the related collection registered under `name`, scoped to this
    /// resource.
    ///
    /// Records supplied at construction, or present in already fetched
    /// attributes, seed the collection; otherwise it lists lazily on first
    /// enumeration. The records are shared by every collection this method
    /// returns for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredAssociation`] if `name` is not a
    /// declared has-many association of this type or has no registered
    /// schema.
    pub fn has_many(&self, name: &str) -> Result<Collection, ResourceError> {
        let (name, records) = self.inner.has_many.get_key_value(name).ok_or_else(|| {
            ResourceError::UnregisteredAssociation {
                name: name.to_string(),
            }
        })?;
        let schema = self.inner.api.associations().collection(name)?;

        if !records.initialized() {
            if let Some(nested @ Value::Array(_)) =
                self.cached_attributes().and_then(|a| a.get(*name))
            {
                let _ = records.set(records_from(nested.clone(), name));
            }
        }

        Ok(Collection::with_records(
            self.inner.api.clone(),
            schema,
            CollectionOptions::new().parent(Some(self.clone())),
            Arc::clone(records),
        ))
    }
}

/// A typed wrapper around a [`Resource`].
///
/// Implementors are thin newtypes; the trait supplies the shared behavior.
/// `From<Resource>` must accept resources built with [`Self::SCHEMA`].
#[allow(async_fn_in_trait)]
pub trait RestResource: From<Resource> + Clone + Send + Sync + Sized {
    /// The schema of this type.
    const SCHEMA: &'static ResourceSchema;

    /// Returns the underlying engine.
    fn resource(&self) -> &Resource;

    /// Builds an instance from known attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingIdentity`] if the attributes carry
    /// neither `resource_url` nor the primary key.
    fn build(api: &Api, attributes: Attributes) -> Result<Self, ResourceError> {
        Resource::new(api.clone(), Self::SCHEMA, ResourceOptions::new(attributes)).map(Self::from)
    }

    /// See [`Resource::with`].
    #[must_use]
    fn with(&self, constraints: Params) -> Self {
        Self::from(self.resource().with(constraints))
    }

    /// See [`Resource::resource_url`].
    ///
    /// # Errors
    ///
    /// See [`Resource::resource_url`].
    fn resource_url(&self) -> Result<String, ResourceError> {
        self.resource().resource_url()
    }

    /// See [`Resource::api_attributes`].
    ///
    /// # Errors
    ///
    /// See [`Resource::api_attributes`].
    async fn api_attributes(&self) -> Result<&Attributes, ResourceError> {
        self.resource().api_attributes().await
    }

    /// See [`Resource::attribute`].
    ///
    /// # Errors
    ///
    /// See [`Resource::attribute`].
    async fn attribute(&self, field: &str) -> Result<Option<Value>, ResourceError> {
        self.resource().attribute(field).await
    }

    /// See [`Resource::delete`].
    ///
    /// # Errors
    ///
    /// See [`Resource::delete`].
    async fn delete(&self) -> Result<bool, ResourceError> {
        self.resource().delete().await
    }
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};
