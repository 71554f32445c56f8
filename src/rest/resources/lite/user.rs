//! User resource and the root user collection.
//!
//! A user is the top of the Lite hierarchy: every email account and webhook
//! lives under one.
//!
//! # Example
//!
//! ```rust,ignore
//! use contextio_lite::rest::{RestCollection, RestResource};
//! use contextio_lite::clients::Params;
//!
//! let users = contextio.users();
//!
//! // Create a user; the email may also come from a `filter`
//! let user = users.create(Some("jane@example.com"), Params::new()).await?;
//!
//! // Rename
//! user.update(Some("Jane"), None).await?;
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::clients::{HttpMethod, Params};
use crate::rest::resources::lite::{EmailAccountCollection, WebhookCollection};
use crate::rest::{
    root_member, success_flag, Api, Attributes, Collection, CollectionOptions, CollectionSchema,
    Resource, ResourceError, ResourceSchema, RestCollection, RestResource, UrlTarget,
};

/// Schema of [`User`].
pub static USER: ResourceSchema = ResourceSchema {
    name: "user",
    primary_key: "id",
    lazy_attributes: &[
        "id",
        "email_addresses",
        "username",
        "created",
        "first_name",
        "last_name",
    ],
    belongs_to: &[],
    has_many: &["email_accounts", "webhooks"],
};

/// Schema of [`UserCollection`].
pub static USERS: CollectionSchema = CollectionSchema {
    name: "users",
    resource: &USER,
    belongs_to: &[],
};

pub(crate) fn users_url(_: UrlTarget<'_>) -> Result<String, ResourceError> {
    Ok("users".to_string())
}

pub(crate) fn user_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    root_member(target, "users")
}

/// A Context.IO user.
#[derive(Clone, Debug)]
pub struct User(Resource);

impl From<Resource> for User {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl RestResource for User {
    const SCHEMA: &'static ResourceSchema = &USER;

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl User {
    /// The id assigned by Context.IO.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn id(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("id").await
    }

    /// Every address known for this user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn email_addresses(&self) -> Result<Vec<String>, ResourceError> {
        Ok(self
            .0
            .attribute_as::<Vec<String>>("email_addresses")
            .await?
            .unwrap_or_default())
    }

    /// The username assigned by Context.IO.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn username(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("username").await
    }

    /// The user's first name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn first_name(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("first_name").await
    }

    /// The user's last name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn last_name(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("last_name").await
    }

    /// When the user was created with Context.IO.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn created_at(&self) -> Result<Option<DateTime<Utc>>, ResourceError> {
        self.0.timestamp("created").await
    }

    /// The user's email accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredAssociation`] if the registry
    /// lacks `email_accounts`.
    pub fn email_accounts(&self) -> Result<EmailAccountCollection, ResourceError> {
        self.0.has_many("email_accounts").map(EmailAccountCollection::from)
    }

    /// The user's webhooks.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredAssociation`] if the registry
    /// lacks `webhooks`.
    pub fn webhooks(&self) -> Result<WebhookCollection, ResourceError> {
        self.0.has_many("webhooks").map(WebhookCollection::from)
    }

    /// Updates the first and/or last name.
    ///
    /// Returns `None` without a request when both are `None`; otherwise the
    /// server's `success` flag. On success the new names replace the local
    /// ones.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn update(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Option<bool>, ResourceError> {
        let mut changes = Attributes::new();
        if let Some(first_name) = first_name {
            changes.insert("first_name".to_string(), Value::from(first_name));
        }
        if let Some(last_name) = last_name {
            changes.insert("last_name".to_string(), Value::from(last_name));
        }

        if changes.is_empty() {
            return Ok(None);
        }

        let body = self.0.request(HttpMethod::Post, "", &changes).await?;
        let succeeded = success_flag(body.as_ref());
        if succeeded {
            self.0.merge_known(changes);
        }

        Ok(Some(succeeded))
    }
}

/// All users of the Context.IO account.
#[derive(Clone, Debug)]
pub struct UserCollection(Collection);

impl From<Collection> for UserCollection {
    fn from(collection: Collection) -> Self {
        Self(collection)
    }
}

impl RestCollection for UserCollection {
    type Item = User;
    const SCHEMA: &'static CollectionSchema = &USERS;

    fn collection(&self) -> &Collection {
        &self.0
    }
}

impl UserCollection {
    /// The root collection of an API handle.
    #[must_use]
    pub fn root(api: &Api) -> Self {
        Self(Collection::new(api.clone(), &USERS, CollectionOptions::new()))
    }

    /// Creates a user.
    ///
    /// The email comes from `email`, else from an `email` entry in `options`,
    /// else from an `email` filter on this collection. Other `options`
    /// (`first_name`, `last_name`, ...) are sent as given.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] before any request when no email
    /// is available, or [`ResourceError`] if the request fails.
    pub async fn create(&self, email: Option<&str>, options: Params) -> Result<User, ResourceError> {
        let mut params = options;
        let email = email
            .map(Value::from)
            .or_else(|| params.remove("email"))
            .or_else(|| self.0.where_constraints().get("email").cloned())
            .filter(|email| !email.is_null())
            .ok_or_else(|| ResourceError::Validation {
                resource: USER.name,
                message: "You must provide an email for new Users.".to_string(),
            })?;

        params.insert("email".to_string(), email);
        self.0.create(&params).await.map(User::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::lite::testing::{api_with, object, ScriptedTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_user_url_uses_id() {
        let (api, _) = api_with(ScriptedTransport::new());
        let user = UserCollection::root(&api).get("u1");

        assert_eq!(user.resource_url().unwrap(), "users/u1");
        assert_eq!(UserCollection::root(&api).resource_url().unwrap(), "users");
    }

    #[tokio::test]
    async fn test_created_at_converts_unix_time() {
        let transport = ScriptedTransport::new()
            .respond("GET users/u1", json!({"id": "u1", "created": 1_400_000_000}));
        let (api, transport) = api_with(transport);
        let user = UserCollection::root(&api).get("u1");

        let created = user.created_at().await.unwrap().unwrap();
        assert_eq!(created.timestamp(), 1_400_000_000);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_update_without_changes_sends_nothing() {
        let (api, transport) = api_with(ScriptedTransport::new());
        let user = UserCollection::root(&api).get("u1");

        assert_eq!(user.update(None, None).await.unwrap(), None);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_overwrites_local_names_on_success() {
        let transport = ScriptedTransport::new()
            .respond("POST users/u1", json!({"success": true}))
            .respond("GET users/u1", json!({"id": "u1", "first_name": "Old", "last_name": "Name"}));
        let (api, transport) = api_with(transport);
        let user = UserCollection::root(&api).get("u1");

        assert_eq!(user.update(Some("Jane"), None).await.unwrap(), Some(true));
        assert_eq!(user.first_name().await.unwrap().as_deref(), Some("Jane"));
        assert_eq!(user.last_name().await.unwrap().as_deref(), Some("Name"));

        let calls = transport.calls();
        assert_eq!(calls[0].params, object(json!({"first_name": "Jane"})));
    }

    #[tokio::test]
    async fn test_update_failure_keeps_local_names() {
        let transport = ScriptedTransport::new()
            .respond("POST users/u1", json!({"success": false}));
        let (api, _) = api_with(transport);
        let user = UserCollection::root(&api).get("u1");

        assert_eq!(user.update(Some("Jane"), None).await.unwrap(), Some(false));
        assert!(user.resource().known("first_name").is_none());
    }

    #[tokio::test]
    async fn test_create_without_email_fails_before_request() {
        let (api, transport) = api_with(ScriptedTransport::new());
        let result = UserCollection::root(&api).create(None, Params::new()).await;

        assert!(matches!(result, Err(ResourceError::Validation { resource: "user", .. })));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_takes_email_from_filter_and_strips_success() {
        let transport = ScriptedTransport::new().respond(
            "POST users",
            json!({"success": true, "id": "new1", "resource_url": "https://api.context.io/lite/users/new1"}),
        );
        let (api, transport) = api_with(transport);
        let users = UserCollection::root(&api).filter(object(json!({"email": "jane@example.com"})));

        let user = users
            .create(None, object(json!({"first_name": "Jane"})))
            .await
            .unwrap();

        assert!(user.resource().known("success").is_none());
        assert_eq!(user.id().await.unwrap().as_deref(), Some("new1"));
        assert_eq!(
            transport.calls()[0].params,
            object(json!({"email": "jane@example.com", "first_name": "Jane"}))
        );
    }
}
