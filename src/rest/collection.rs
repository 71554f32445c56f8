//! The generic multi-entity engine.
//!
//! A [`Collection`] is a filterable, lazily listed set of resources of one
//! type, scoped under at most one parent resource. The list is fetched with
//! a single GET on first enumeration (or size check) and reused for the life
//! of the instance; [`Collection::filter`] returns a fresh instance instead
//! of mutating the receiver.
//!
//! # Example
//!
//! ```rust,ignore
//! use contextio_lite::rest::RestCollection;
//! use serde_json::json;
//!
//! let accounts = user.email_accounts()?;
//! let active = accounts.filter(params(json!({"status": "OK"})));
//!
//! // One GET here...
//! println!("{} accounts", active.size().await?);
//! // ...and none here
//! for account in active.to_vec().await? {
//!     println!("{:?}", account.label().await?);
//! }
//!
//! // No request at all
//! let inbox = user.email_accounts()?.get("primary");
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tokio::sync::OnceCell;

use crate::clients::{HttpMethod, Params};
use crate::rest::api::Api;
use crate::rest::resource::{Resource, ResourceOptions, RestResource};
use crate::rest::schema::{merge_constraints, Attributes, CollectionSchema};
use crate::rest::url_builder::UrlTarget;
use crate::rest::ResourceError;

/// Construction options for a [`Collection`].
#[derive(Clone, Debug, Default)]
pub struct CollectionOptions {
    parent: Option<Resource>,
    where_constraints: Params,
    records: Option<Vec<Attributes>>,
}

impl CollectionOptions {
    /// Creates empty options: no parent, no constraints, not yet listed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parent the collection is scoped under.
    #[must_use]
    pub fn parent(mut self, parent: Option<Resource>) -> Self {
        self.parent = parent;
        self
    }

    /// Sets the `where` constraints sent with the list request.
    #[must_use]
    pub fn where_constraints(mut self, constraints: Params) -> Self {
        self.where_constraints = constraints;
        self
    }

    /// Supplies the records up front, skipping the list request.
    #[must_use]
    pub fn records(mut self, records: Vec<Attributes>) -> Self {
        self.records = Some(records);
        self
    }
}

/// A lazily listed set of resources.
///
/// Cloning is cheap and clones share the listed records.
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    api: Api,
    schema: &'static CollectionSchema,
    parent: Option<Resource>,
    where_constraints: Params,
    records: Arc<OnceCell<Vec<Attributes>>>,
    resource_url: OnceLock<String>,
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("schema", &self.inner.schema.name)
            .field("where", &self.inner.where_constraints)
            .field("parent", &self.inner.parent.as_ref().map(|p| p.schema().name))
            .field("listed", &self.inner.records.initialized())
            .finish_non_exhaustive()
    }
}

impl Collection {
    /// Builds a collection.
    #[must_use]
    pub fn new(
        api: Api,
        schema: &'static CollectionSchema,
        mut options: CollectionOptions,
    ) -> Self {
        let records = Arc::new(OnceCell::new_with(options.records.take()));
        Self::with_records(api, schema, options, records)
    }

    pub(crate) fn with_records(
        api: Api,
        schema: &'static CollectionSchema,
        options: CollectionOptions,
        records: Arc<OnceCell<Vec<Attributes>>>,
    ) -> Self {
        Self {
            inner: Arc::new(CollectionInner {
                api,
                schema,
                parent: options.parent,
                where_constraints: options.where_constraints,
                records,
                resource_url: OnceLock::new(),
            }),
        }
    }

    /// Returns the API handle.
    #[must_use]
    pub fn api(&self) -> &Api {
        &self.inner.api
    }

    /// Returns the schema describing this collection's type.
    #[must_use]
    pub fn schema(&self) -> &'static CollectionSchema {
        self.inner.schema
    }

    /// Returns the parent this collection is scoped under, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Resource> {
        self.inner.parent.as_ref()
    }

    /// Returns the `where` constraints sent with the list request.
    #[must_use]
    pub fn where_constraints(&self) -> &Params {
        &self.inner.where_constraints
    }

    /// Returns `true` once the records are available without a request.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.records.initialized()
    }

    /// Returns the memoized path of this collection.
    ///
    /// # Errors
    ///
    /// Returns a configuration-class [`ResourceError`] if the path cannot be
    /// built.
    pub fn resource_url(&self) -> Result<String, ResourceError> {
        if let Some(url) = self.inner.resource_url.get() {
            return Ok(url.clone());
        }

        let url = self.inner.api.url_for(UrlTarget::Collection(self))?;
        Ok(self.inner.resource_url.get_or_init(|| url).clone())
    }

    /// Returns the raw records, listing them on first call.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the URL cannot be built or the request
    /// fails. A failed listing is not cached.
    pub async fn records(&self) -> Result<&[Attributes], ResourceError> {
        let records = self
            .inner
            .records
            .get_or_try_init(|| async {
                let url = self.resource_url()?;
                let name = self.schema().name;
                tracing::debug!(collection = name, url = %url, "Listing collection");

                let body = self
                    .inner
                    .api
                    .request(HttpMethod::Get, &url, &self.inner.where_constraints)
                    .await?;

                Ok::<_, ResourceError>(match body {
                    Some(list @ Value::Array(_)) => records_from(list, name),
                    other => {
                        tracing::warn!(
                            collection = name,
                            body = ?other,
                            "Expected a list of records; treating as empty"
                        );
                        Vec::new()
                    }
                })
            })
            .await?;

        Ok(records.as_slice())
    }

    /// Wraps a record into a resource scoped under this collection's parent.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingIdentity`] if the record carries
    /// neither `resource_url` nor the primary key.
    pub fn resource_from(&self, record: Attributes) -> Result<Resource, ResourceError> {
        Resource::new(
            self.inner.api.clone(),
            self.inner.schema.resource,
            ResourceOptions::new(record).parent(self.inner.parent.clone()),
        )
    }

    /// Lists (at most once) and yields a resource per record.
    ///
    /// Records are wrapped as the iterator advances; enumerating again
    /// reuses the listed records.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if listing fails. Each item fails on its
    /// own if its record cannot be wrapped.
    pub async fn iter(
        &self,
    ) -> Result<impl Iterator<Item = Result<Resource, ResourceError>> + '_, ResourceError> {
        let records = self.records().await?;
        Ok(records
            .iter()
            .map(move |record| self.resource_from(record.clone())))
    }

    /// Lists (at most once) and wraps every record.
    ///
    /// # Errors
    ///
    /// Returns the first listing or wrapping error.
    pub async fn to_vec(&self) -> Result<Vec<Resource>, ResourceError> {
        self.iter().await?.collect()
    }

    /// Returns the number of records, listing them on first call.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if listing fails.
    pub async fn size(&self) -> Result<usize, ResourceError> {
        Ok(self.records().await?.len())
    }

    /// Returns `true` if the collection has no records, listing on first call.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if listing fails.
    pub async fn is_empty(&self) -> Result<bool, ResourceError> {
        Ok(self.size().await? == 0)
    }

    /// Returns a new collection with `constraints` layered over the current
    /// `where` constraints. Boolean values become `1`/`0`.
    ///
    /// The receiver is left untouched; the new collection lists on its own.
    #[must_use]
    pub fn filter(&self, constraints: Params) -> Self {
        Self::new(
            self.inner.api.clone(),
            self.inner.schema,
            CollectionOptions::new()
                .parent(self.inner.parent.clone())
                .where_constraints(merge_constraints(&self.inner.where_constraints, constraints)),
        )
    }

    /// Returns the member addressed by `key` without any request.
    ///
    /// Whether it exists is only established when one of its attributes is
    /// read.
    #[must_use]
    pub fn get(&self, key: impl Into<Value>) -> Resource {
        let schema = self.inner.schema.resource;
        let mut attributes = Attributes::new();
        attributes.insert(schema.primary_key.to_string(), key.into());

        Resource::unchecked(
            self.inner.api.clone(),
            schema,
            ResourceOptions::new(attributes).parent(self.inner.parent.clone()),
        )
    }

    /// Creates a member with a POST to the collection path.
    ///
    /// The server's `success` flag is stripped from the response and the
    /// remaining fields describe the new resource.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the response does
    /// not identify the new resource.
    pub async fn create(&self, params: &Params) -> Result<Resource, ResourceError> {
        let url = self.resource_url()?;
        let body = self.inner.api.request(HttpMethod::Post, &url, params).await?;

        let mut attributes = match body {
            Some(Value::Object(map)) => map,
            other => {
                tracing::warn!(
                    collection = self.schema().name,
                    body = ?other,
                    "Create response is not an object"
                );
                Attributes::new()
            }
        };
        attributes.remove("success");

        self.resource_from(attributes)
    }
}

/// Extracts the object records of a JSON array, skipping anything else.
pub(crate) fn records_from(value: Value, context: &str) -> Vec<Attributes> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            other => {
                tracing::warn!(context, record = ?other, "Skipping non-object record");
                None
            }
        })
        .collect()
}

/// A typed wrapper around a [`Collection`].
#[allow(async_fn_in_trait)]
pub trait RestCollection: From<Collection> + Clone + Send + Sync + Sized {
    /// The typed resource the collection yields.
    type Item: RestResource;

    /// The schema of this type.
    const SCHEMA: &'static CollectionSchema;

    /// Returns the underlying engine.
    fn collection(&self) -> &Collection;

    /// See [`Collection::filter`].
    #[must_use]
    fn filter(&self, constraints: Params) -> Self {
        Self::from(self.collection().filter(constraints))
    }

    /// See [`Collection::get`].
    #[must_use]
    fn get(&self, key: impl Into<Value>) -> Self::Item {
        Self::Item::from(self.collection().get(key))
    }

    /// See [`Collection::where_constraints`].
    fn where_constraints(&self) -> &Params {
        self.collection().where_constraints()
    }

    /// See [`Collection::resource_url`].
    ///
    /// # Errors
    ///
    /// See [`Collection::resource_url`].
    fn resource_url(&self) -> Result<String, ResourceError> {
        self.collection().resource_url()
    }

    /// See [`Collection::to_vec`].
    ///
    /// # Errors
    ///
    /// See [`Collection::to_vec`].
    async fn to_vec(&self) -> Result<Vec<Self::Item>, ResourceError> {
        Ok(self
            .collection()
            .to_vec()
            .await?
            .into_iter()
            .map(Self::Item::from)
            .collect())
    }

    /// See [`Collection::size`].
    ///
    /// # Errors
    ///
    /// See [`Collection::size`].
    async fn size(&self) -> Result<usize, ResourceError> {
        self.collection().size().await
    }

    /// See [`Collection::is_empty`].
    ///
    /// # Errors
    ///
    /// See [`Collection::is_empty`].
    async fn is_empty(&self) -> Result<bool, ResourceError> {
        self.collection().is_empty().await
    }
}

// Verify Collection is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Collection>();
};
