//! Email accounts connected to a user.
//!
//! An email account is addressed by its `label` under the owning user, e.g.
//! `users/{id}/email_accounts/{label}`.

use serde_json::Value;

use crate::clients::{HttpMethod, Params};
use crate::rest::resources::lite::{FolderCollection, User};
use crate::rest::{
    nested_collection, nested_member, success_flag, truthy, Collection, CollectionSchema,
    Resource, ResourceError, ResourceSchema, RestCollection, RestResource, UrlTarget,
};

/// Schema of [`EmailAccount`].
pub static EMAIL_ACCOUNT: ResourceSchema = ResourceSchema {
    name: "email_account",
    primary_key: "label",
    lazy_attributes: &[
        "server",
        "label",
        "username",
        "port",
        "authentication_type",
        "status",
        "service_level",
        "sync_period",
        "use_ssl",
        "type",
    ],
    belongs_to: &["user"],
    has_many: &["folders"],
};

/// Schema of [`EmailAccountCollection`].
pub static EMAIL_ACCOUNTS: CollectionSchema = CollectionSchema {
    name: "email_accounts",
    resource: &EMAIL_ACCOUNT,
    belongs_to: &["user"],
};

pub(crate) fn email_accounts_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_collection(target, "user", "email_accounts")
}

pub(crate) fn email_account_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_member(target, "user", "email_accounts")
}

/// A mailbox the user connected.
#[derive(Clone, Debug)]
pub struct EmailAccount(Resource);

impl From<Resource> for EmailAccount {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl RestResource for EmailAccount {
    const SCHEMA: &'static ResourceSchema = &EMAIL_ACCOUNT;

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl EmailAccount {
    /// The label addressing this account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn label(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("label").await
    }

    /// The IMAP server host.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn server(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("server").await
    }

    /// The IMAP login.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn username(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("username").await
    }

    /// The IMAP port.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn port(&self) -> Result<Option<u64>, ResourceError> {
        self.0.unsigned("port").await
    }

    /// Whether the connection uses SSL; absent reads as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn use_ssl(&self) -> Result<bool, ResourceError> {
        Ok(self
            .0
            .attribute("use_ssl")
            .await?
            .is_some_and(|value| truthy(&value)))
    }

    /// The account type (e.g. `IMAP`).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn account_type(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("type").await
    }

    /// The authentication type (`password`, `oauth2`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn authentication_type(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("authentication_type").await
    }

    /// The connection status reported by Context.IO.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn status(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("status").await
    }

    /// The owning user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the user cannot be materialized.
    pub async fn user(&self) -> Result<Option<User>, ResourceError> {
        Ok(self.0.belongs_to("user").await?.map(User::from))
    }

    /// The account's folders.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredAssociation`] if the registry
    /// lacks `folders`.
    pub fn folders(&self) -> Result<FolderCollection, ResourceError> {
        self.0.has_many("folders").map(FolderCollection::from)
    }

    /// Updates server-side settings (`password`, `provider_refresh_token`,
    /// `status_callback_url`, ...) and returns the `success` flag.
    ///
    /// On success the sent fields replace the local ones.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn update(&self, changes: Params) -> Result<bool, ResourceError> {
        let body = self.0.request(HttpMethod::Post, "", &changes).await?;
        let succeeded = success_flag(body.as_ref());
        if succeeded {
            self.0.merge_known(changes);
        }
        Ok(succeeded)
    }
}

/// The email accounts of one user.
#[derive(Clone, Debug)]
pub struct EmailAccountCollection(Collection);

impl From<Collection> for EmailAccountCollection {
    fn from(collection: Collection) -> Self {
        Self(collection)
    }
}

impl RestCollection for EmailAccountCollection {
    type Item = EmailAccount;
    const SCHEMA: &'static CollectionSchema = &EMAIL_ACCOUNTS;

    fn collection(&self) -> &Collection {
        &self.0
    }
}

/// Connection settings of a new email account.
#[derive(Clone, Debug)]
pub struct NewEmailAccount<'a> {
    /// Primary address of the mailbox.
    pub email: &'a str,
    /// IMAP server host.
    pub server: &'a str,
    /// IMAP login.
    pub username: &'a str,
    /// Whether to connect over SSL.
    pub use_ssl: bool,
    /// IMAP port.
    pub port: u16,
    /// Account type, usually `IMAP`.
    pub account_type: &'a str,
}

impl EmailAccountCollection {
    /// Connects a new email account.
    ///
    /// `options` carries the credentials (`password` or
    /// `provider_refresh_token` and `provider_consumer_key`) and any other
    /// optional fields.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the response does
    /// not identify the new account.
    pub async fn create(
        &self,
        account: NewEmailAccount<'_>,
        options: Params,
    ) -> Result<EmailAccount, ResourceError> {
        let mut params = options;
        params.insert("email".to_string(), Value::from(account.email));
        params.insert("server".to_string(), Value::from(account.server));
        params.insert("username".to_string(), Value::from(account.username));
        params.insert(
            "use_ssl".to_string(),
            Value::from(if account.use_ssl { "1" } else { "0" }),
        );
        params.insert("port".to_string(), Value::from(account.port.to_string()));
        params.insert("type".to_string(), Value::from(account.account_type));

        self.0.create(&params).await.map(EmailAccount::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::lite::testing::{api_with, object, ScriptedTransport};
    use crate::rest::resources::lite::{User, UserCollection};
    use serde_json::json;

    #[tokio::test]
    async fn test_seeded_accounts_are_not_listed_again() {
        let (api, transport) = api_with(ScriptedTransport::new());
        let user = User::build(
            &api,
            object(json!({
                "id": "u1",
                "email_accounts": [{"label": "primary"}, {"label": "work"}]
            })),
        )
        .unwrap();

        let accounts = user.email_accounts().unwrap();
        assert_eq!(accounts.size().await.unwrap(), 2);

        let mut labels = Vec::new();
        for account in accounts.to_vec().await.unwrap() {
            labels.push(account.label().await.unwrap().unwrap());
        }
        assert_eq!(labels, vec!["primary", "work"]);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_seeded_accounts_survive_with() {
        let (api, transport) = api_with(ScriptedTransport::new());
        let user = User::build(
            &api,
            object(json!({
                "id": "u1",
                "email_accounts": [{"label": "primary"}]
            })),
        )
        .unwrap();

        let narrowed = user.with(object(json!({"include_thread_size": true})));
        let accounts = narrowed.email_accounts().unwrap();

        assert_eq!(accounts.size().await.unwrap(), 1);
        assert!(transport.calls().is_empty());
        assert!(narrowed.resource().known("email_accounts").is_none());
    }

    #[tokio::test]
    async fn test_user_belongs_to_returns_parent() {
        let (api, transport) = api_with(ScriptedTransport::new());
        let user = UserCollection::root(&api).get("u1");
        let account = user.email_accounts().unwrap().get("primary");

        let owner = account.user().await.unwrap().unwrap();
        assert_eq!(owner.resource_url().unwrap(), "users/u1");
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_use_ssl_and_port_parse_loose_values() {
        let transport = ScriptedTransport::new().respond(
            "GET users/u1/email_accounts/primary",
            json!({"label": "primary", "use_ssl": 1, "port": "993", "type": "IMAP"}),
        );
        let (api, transport) = api_with(transport);
        let account = UserCollection::root(&api)
            .get("u1")
            .email_accounts()
            .unwrap()
            .get("primary");

        assert!(account.use_ssl().await.unwrap());
        assert_eq!(account.port().await.unwrap(), Some(993));
        assert_eq!(account.account_type().await.unwrap().as_deref(), Some("IMAP"));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_sent_fields_on_success() {
        let transport = ScriptedTransport::new()
            .respond("POST users/u1/email_accounts/primary", json!({"success": true}));
        let (api, _) = api_with(transport);
        let account = UserCollection::root(&api)
            .get("u1")
            .email_accounts()
            .unwrap()
            .get("primary");

        let updated = account
            .update(object(json!({"status_callback_url": "https://example.com/cb"})))
            .await
            .unwrap();

        assert!(updated);
        assert_eq!(
            account.resource().known("status_callback_url"),
            Some(json!("https://example.com/cb"))
        );
    }

    #[tokio::test]
    async fn test_create_encodes_ssl_and_port_as_strings() {
        let transport = ScriptedTransport::new().respond(
            "POST users/u1/email_accounts",
            json!({"success": true, "label": "jane::imap.example.com"}),
        );
        let (api, transport) = api_with(transport);
        let accounts = UserCollection::root(&api).get("u1").email_accounts().unwrap();

        let account = accounts
            .create(
                NewEmailAccount {
                    email: "jane@example.com",
                    server: "imap.example.com",
                    username: "jane",
                    use_ssl: true,
                    port: 993,
                    account_type: "IMAP",
                },
                object(json!({"password": "hunter2"})),
            )
            .await
            .unwrap();

        assert_eq!(
            account.resource_url().unwrap(),
            "users/u1/email_accounts/jane%3A%3Aimap.example.com"
        );

        let params = &transport.calls()[0].params;
        assert_eq!(params["use_ssl"], json!("1"));
        assert_eq!(params["port"], json!("993"));
        assert_eq!(params["password"], json!("hunter2"));
    }
}
