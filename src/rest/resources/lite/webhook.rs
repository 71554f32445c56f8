//! Webhooks registered for a user.
//!
//! A webhook POSTs to `callback_url` whenever a message matching its
//! filters arrives. See [`webhooks`](crate::webhooks) for verifying those
//! callbacks.

use serde_json::Value;

use crate::clients::{HttpMethod, Params};
use crate::rest::resources::lite::User;
use crate::rest::{
    nested_collection, nested_member, success_flag, truthy, Collection, CollectionSchema,
    Resource, ResourceError, ResourceSchema, RestCollection, RestResource, UrlTarget,
};

/// Schema of [`Webhook`].
pub static WEBHOOK: ResourceSchema = ResourceSchema {
    name: "webhook",
    primary_key: "webhook_id",
    lazy_attributes: &[
        "callback_url",
        "failure_notif_url",
        "active",
        "webhook_id",
        "failure",
        "filter_to",
        "filter_from",
        "filter_cc",
        "filter_subject",
        "filter_thread",
        "filter_new_important",
        "filter_file_name",
        "filter_folder_added",
        "filter_to_domain",
        "filter_folder_domain",
        "include_body",
        "body_type",
    ],
    belongs_to: &["user"],
    has_many: &[],
};

/// Schema of [`WebhookCollection`].
pub static WEBHOOKS: CollectionSchema = CollectionSchema {
    name: "webhooks",
    resource: &WEBHOOK,
    belongs_to: &["user"],
};

pub(crate) fn webhooks_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_collection(target, "user", "webhooks")
}

pub(crate) fn webhook_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_member(target, "user", "webhooks")
}

/// A webhook.
#[derive(Clone, Debug)]
pub struct Webhook(Resource);

impl From<Resource> for Webhook {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl RestResource for Webhook {
    const SCHEMA: &'static ResourceSchema = &WEBHOOK;

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl Webhook {
    /// The webhook id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn webhook_id(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("webhook_id").await
    }

    /// Where matching messages are POSTed.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn callback_url(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("callback_url").await
    }

    /// Where delivery failures are reported.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn failure_notif_url(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("failure_notif_url").await
    }

    /// Whether the webhook is delivering.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn is_active(&self) -> Result<bool, ResourceError> {
        self.flag("active").await
    }

    /// Whether Context.IO disabled the webhook after failed deliveries.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn is_failing(&self) -> Result<bool, ResourceError> {
        self.flag("failure").await
    }

    async fn flag(&self, field: &str) -> Result<bool, ResourceError> {
        Ok(self
            .0
            .attribute(field)
            .await?
            .is_some_and(|value| truthy(&value)))
    }

    /// The `filter_*` fields the webhook was created with, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn filters(&self) -> Result<Params, ResourceError> {
        let mut filters = Params::new();
        for field in WEBHOOK
            .lazy_attributes
            .iter()
            .filter(|field| field.starts_with("filter_"))
        {
            if let Some(value) = self.0.attribute(field).await? {
                filters.insert((*field).to_string(), value);
            }
        }
        Ok(filters)
    }

    /// Resumes delivery and returns the `success` flag.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn activate(&self) -> Result<bool, ResourceError> {
        self.set_active(true).await
    }

    /// Pauses delivery and returns the `success` flag.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn deactivate(&self) -> Result<bool, ResourceError> {
        self.set_active(false).await
    }

    async fn set_active(&self, active: bool) -> Result<bool, ResourceError> {
        let mut params = Params::new();
        params.insert("active".to_string(), Value::from(u8::from(active)));

        let body = self.0.request(HttpMethod::Post, "", &params).await?;
        Ok(success_flag(body.as_ref()))
    }

    /// The user owning this webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the user cannot be materialized.
    pub async fn user(&self) -> Result<Option<User>, ResourceError> {
        Ok(self.0.belongs_to("user").await?.map(User::from))
    }
}

/// The webhooks of one user.
#[derive(Clone, Debug)]
pub struct WebhookCollection(Collection);

impl From<Collection> for WebhookCollection {
    fn from(collection: Collection) -> Self {
        Self(collection)
    }
}

impl RestCollection for WebhookCollection {
    type Item = Webhook;
    const SCHEMA: &'static CollectionSchema = &WEBHOOKS;

    fn collection(&self) -> &Collection {
        &self.0
    }
}

impl WebhookCollection {
    /// Registers a webhook.
    ///
    /// `options` carries the `filter_*` fields and any other optional
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the response does
    /// not identify the new webhook.
    pub async fn create(
        &self,
        callback_url: &str,
        failure_notif_url: &str,
        options: Params,
    ) -> Result<Webhook, ResourceError> {
        let mut params = options;
        params.insert("callback_url".to_string(), Value::from(callback_url));
        params.insert(
            "failure_notif_url".to_string(),
            Value::from(failure_notif_url),
        );

        self.0.create(&params).await.map(Webhook::from)
    }
}
