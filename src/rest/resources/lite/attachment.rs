//! File attachments of a message.

use crate::rest::resources::lite::Message;
use crate::rest::{
    nested_collection, nested_member, Attributes, Collection, CollectionSchema, Resource,
    ResourceError, ResourceSchema, RestCollection, RestResource, UrlTarget,
};

/// Schema of [`Attachment`].
pub static ATTACHMENT: ResourceSchema = ResourceSchema {
    name: "attachment",
    primary_key: "attachment_id",
    lazy_attributes: &["headers", "content"],
    belongs_to: &["message"],
    has_many: &[],
};

/// Schema of [`AttachmentCollection`].
pub static ATTACHMENTS: CollectionSchema = CollectionSchema {
    name: "attachments",
    resource: &ATTACHMENT,
    belongs_to: &["message"],
};

pub(crate) fn attachments_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_collection(target, "message", "attachments")
}

pub(crate) fn attachment_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_member(target, "message", "attachments")
}

/// An attachment, addressed by its numeric `attachment_id`.
#[derive(Clone, Debug)]
pub struct Attachment(Resource);

impl From<Resource> for Attachment {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl RestResource for Attachment {
    const SCHEMA: &'static ResourceSchema = &ATTACHMENT;

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl Attachment {
    /// The MIME headers of the part.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn headers(&self) -> Result<Attributes, ResourceError> {
        Ok(self
            .0
            .attribute_as::<Attributes>("headers")
            .await?
            .unwrap_or_default())
    }

    /// The content as returned by the API.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn content(&self) -> Result<Option<String>, ResourceError> {
        self.0.text("content").await
    }

    /// The message this attachment belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the message cannot be materialized.
    pub async fn message(&self) -> Result<Option<Message>, ResourceError> {
        Ok(self.0.belongs_to("message").await?.map(Into::into))
    }
}

/// The attachments of one message.
#[derive(Clone, Debug)]
pub struct AttachmentCollection(Collection);

impl From<Collection> for AttachmentCollection {
    fn from(collection: Collection) -> Self {
        Self(collection)
    }
}

impl RestCollection for AttachmentCollection {
    type Item = Attachment;
    const SCHEMA: &'static CollectionSchema = &ATTACHMENTS;

    fn collection(&self) -> &Collection {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::lite::testing::{api_with, object, ScriptedTransport};
    use crate::rest::resources::lite::{Folder, FolderCollection, UserCollection};
    use serde_json::json;

    fn inbox(api: &crate::rest::Api) -> Folder {
        let folders: FolderCollection = UserCollection::root(api)
            .get("u1")
            .email_accounts()
            .unwrap()
            .get("primary")
            .folders()
            .unwrap();
        folders.get("Inbox")
    }

    #[tokio::test]
    async fn test_attachments_seeded_from_listed_message() {
        let transport = ScriptedTransport::new().respond(
            "GET users/u1/email_accounts/primary/folders/Inbox/messages",
            json!([{
                "message_id": "m1",
                "attachments": [
                    {"attachment_id": 1, "content": "aGk="},
                    {"attachment_id": 2}
                ]
            }]),
        );
        let (api, transport) = api_with(transport);
        let message = inbox(&api).messages().unwrap().to_vec().await.unwrap().remove(0);

        let attachments = message.attachments().unwrap();
        assert_eq!(attachments.size().await.unwrap(), 2);

        let first = attachments.to_vec().await.unwrap().remove(0);
        assert_eq!(first.content().await.unwrap().as_deref(), Some("aGk="));
        assert_eq!(
            first.resource_url().unwrap(),
            "users/u1/email_accounts/primary/folders/Inbox/messages/m1/attachments/1"
        );
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_message_from_nested_attributes() {
        let (api, transport) = api_with(ScriptedTransport::new());
        let attachment = Attachment::build(
            &api,
            object(json!({
                "attachment_id": 4,
                "resource_url": "users/u1/email_accounts/primary/folders/Inbox/messages/m1/attachments/4",
                "message": {
                    "message_id": "m1",
                    "resource_url": "users/u1/email_accounts/primary/folders/Inbox/messages/m1"
                }
            })),
        )
        .unwrap();

        let message = attachment.message().await.unwrap().unwrap();
        assert_eq!(
            message.resource_url().unwrap(),
            "users/u1/email_accounts/primary/folders/Inbox/messages/m1"
        );
        assert!(transport.calls().is_empty());
    }
}
