//! IMAP folders of an email account.

use crate::rest::resources::lite::{EmailAccount, MessageCollection};
use crate::rest::{
    nested_collection, nested_member, Collection, CollectionSchema, Resource, ResourceError,
    ResourceSchema, RestCollection, RestResource, UrlTarget,
};

/// Schema of [`Folder`].
pub static FOLDER: ResourceSchema = ResourceSchema {
    name: "folder",
    primary_key: "name",
    lazy_attributes: &["name", "delimiter", "nb_messages", "nb_unseen_messages"],
    belongs_to: &["email_account"],
    has_many: &["messages"],
};

/// Schema of [`FolderCollection`].
pub static FOLDERS: CollectionSchema = CollectionSchema {
    name: "folders",
    resource: &FOLDER,
    belongs_to: &["email_account"],
};

pub(crate) fn folders_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_collection(target, "email_account", "folders")
}

pub(crate) fn folder_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_member(target, "email_account", "folders")
}

/// A folder, addressed by its full IMAP name.
#[derive(Clone, Debug)]
pub struct Folder(Resource);

impl From<Resource> for Folder {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl RestResource for Folder {
    const SCHEMA: &'static ResourceSchema = &FOLDER;

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl Folder {
    /// The full folder name (e.g. `[Gmail]/All Mail`).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn name(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("name").await
    }

    /// The hierarchy delimiter of the server.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn delimiter(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("delimiter").await
    }

    /// Number of messages in the folder.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn nb_messages(&self) -> Result<Option<u64>, ResourceError> {
        self.0.unsigned("nb_messages").await
    }

    /// Number of unseen messages in the folder.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn nb_unseen_messages(&self) -> Result<Option<u64>, ResourceError> {
        self.0.unsigned("nb_unseen_messages").await
    }

    /// The email account holding this folder.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the account cannot be materialized.
    pub async fn email_account(&self) -> Result<Option<EmailAccount>, ResourceError> {
        Ok(self
            .0
            .belongs_to("email_account")
            .await?
            .map(EmailAccount::from))
    }

    /// The folder's messages.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredAssociation`] if the registry
    /// lacks `messages`.
    pub fn messages(&self) -> Result<MessageCollection, ResourceError> {
        self.0.has_many("messages").map(MessageCollection::from)
    }
}

/// The folders of one email account.
#[derive(Clone, Debug)]
pub struct FolderCollection(Collection);

impl From<Collection> for FolderCollection {
    fn from(collection: Collection) -> Self {
        Self(collection)
    }
}

impl RestCollection for FolderCollection {
    type Item = Folder;
    const SCHEMA: &'static CollectionSchema = &FOLDERS;

    fn collection(&self) -> &Collection {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;
    use crate::rest::resources::lite::testing::{api_with, object, ScriptedTransport};
    use crate::rest::resources::lite::UserCollection;
    use serde_json::json;

    fn folders(api: &crate::rest::Api) -> FolderCollection {
        UserCollection::root(api)
            .get("u1")
            .email_accounts()
            .unwrap()
            .get("primary")
            .folders()
            .unwrap()
    }

    #[tokio::test]
    async fn test_listing_happens_once() {
        let transport = ScriptedTransport::new().respond(
            "GET users/u1/email_accounts/primary/folders",
            json!([
                {"name": "Inbox", "nb_messages": 12},
                {"name": "Sent", "nb_messages": 3}
            ]),
        );
        let (api, transport) = api_with(transport);
        let folders = folders(&api);

        assert_eq!(folders.size().await.unwrap(), 2);
        let listed = folders.to_vec().await.unwrap();
        assert_eq!(listed[0].nb_messages().await.unwrap(), Some(12));
        assert!(!folders.is_empty().await.unwrap());

        assert_eq!(
            transport.count(HttpMethod::Get, "users/u1/email_accounts/primary/folders"),
            1
        );
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_filter_sends_normalized_constraints() {
        let transport = ScriptedTransport::new()
            .respond("GET users/u1/email_accounts/primary/folders", json!([]));
        let (api, transport) = api_with(transport);
        let all = folders(&api);

        let filtered = all.filter(object(json!({"include_extended_counts": true})));
        assert!(filtered.is_empty().await.unwrap());

        assert!(all.where_constraints().is_empty());
        assert_eq!(
            transport.calls()[0].params,
            object(json!({"include_extended_counts": 1}))
        );
    }

    #[tokio::test]
    async fn test_listed_folder_knows_its_account() {
        let transport = ScriptedTransport::new().respond(
            "GET users/u1/email_accounts/primary/folders",
            json!([{"name": "Inbox"}]),
        );
        let (api, _) = api_with(transport);
        let inbox = folders(&api).to_vec().await.unwrap().remove(0);

        let account = inbox.email_account().await.unwrap().unwrap();
        assert_eq!(
            account.resource_url().unwrap(),
            "users/u1/email_accounts/primary"
        );
        assert_eq!(
            inbox.messages().unwrap().resource_url().unwrap(),
            "users/u1/email_accounts/primary/folders/Inbox/messages"
        );
    }
}
