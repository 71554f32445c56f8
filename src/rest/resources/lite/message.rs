//! Messages of a folder and their sub-resources.
//!
//! Besides the plain attribute fetch, a message exposes four sub-resources
//! under its own path: `/body`, `/flags`, `/headers` and `/raw`. When the
//! message was scoped with the matching `include_*` constraint (see
//! [`RestResource::with`]) the first three are served from the attribute
//! map instead of a separate request.
//!
//! # Example
//!
//! ```rust,ignore
//! use contextio_lite::rest::RestResource;
//! use serde_json::json;
//!
//! let message = folder.messages()?.get("<abc@mail.example.com>");
//!
//! // One GET for the attributes, bodies included
//! let message = message.with(params(json!({"include_body": true})));
//! println!("{}", message.body_plain().await?);
//!
//! // Separate GET on /flags
//! if !message.flags().await?.seen {
//!     message.mark_read().await?;
//! }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::clients::{HttpMethod, Params};
use crate::rest::resources::lite::{AttachmentCollection, Folder};
use crate::rest::{
    constraint_enabled, nested_collection, nested_member, success_flag, truthy, Attributes,
    Collection, CollectionSchema, Resource, ResourceError, ResourceSchema, RestCollection,
    RestResource, UrlTarget,
};

/// Schema of [`Message`].
pub static MESSAGE: ResourceSchema = ResourceSchema {
    name: "message",
    primary_key: "message_id",
    lazy_attributes: &[
        "sent_at",
        "addresses",
        "person_info",
        "email_message_id",
        "message_id",
        "subject",
        "folders",
        "bodies",
        "references",
        "in_reply_to",
        "list_headers",
        "received_headers",
    ],
    belongs_to: &["folder"],
    has_many: &["attachments"],
};

/// Schema of [`MessageCollection`].
pub static MESSAGES: CollectionSchema = CollectionSchema {
    name: "messages",
    resource: &MESSAGE,
    belongs_to: &["folder"],
};

pub(crate) fn messages_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_collection(target, "folder", "messages")
}

pub(crate) fn message_url(target: UrlTarget<'_>) -> Result<String, ResourceError> {
    nested_member(target, "folder", "messages")
}

/// Flags the server documents; missing ones read as `false`.
const FLAG_KEYS: [&str; 5] = ["seen", "answered", "flagged", "draft", "deleted"];

/// A participant of a message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// The email address.
    #[serde(default)]
    pub email: Option<String>,
    /// The display name, when present.
    #[serde(default)]
    pub name: Option<String>,
}

/// One MIME body part.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// MIME type, e.g. `text/plain`.
    #[serde(rename = "type", default)]
    pub body_type: Option<String>,
    /// Character set of the content.
    #[serde(default)]
    pub charset: Option<String>,
    /// The decoded content.
    #[serde(default)]
    pub content: Option<String>,
}

/// IMAP flags of a message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageFlags {
    /// `\Seen`; reported as `read` by some endpoints.
    pub seen: bool,
    /// `\Answered`.
    pub answered: bool,
    /// `\Flagged`.
    pub flagged: bool,
    /// `\Draft`.
    pub draft: bool,
    /// `\Deleted`.
    pub deleted: bool,
    /// Any flag outside the five above, as the server sent it.
    pub other: Attributes,
}

impl MessageFlags {
    fn from_map(mut map: Attributes) -> Self {
        if let Some(read) = map.remove("read") {
            map.insert("seen".to_string(), read);
        }

        let mut take = |key: &str| map.remove(key).is_some_and(|value| truthy(&value));
        let [seen, answered, flagged, draft, deleted] = FLAG_KEYS.map(&mut take);

        Self {
            seen,
            answered,
            flagged,
            draft,
            deleted,
            other: map,
        }
    }
}

#[derive(Default)]
struct MessageCache {
    bodies: OnceCell<Vec<MessageBody>>,
    flags: OnceCell<MessageFlags>,
    headers: OnceCell<Attributes>,
}

/// A message, addressed by its Context.IO `message_id`.
///
/// Clones share the sub-resource caches.
#[derive(Clone)]
pub struct Message {
    resource: Resource,
    cache: Arc<MessageCache>,
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Message").field(&self.resource).finish()
    }
}

impl From<Resource> for Message {
    fn from(resource: Resource) -> Self {
        Self {
            resource,
            cache: Arc::default(),
        }
    }
}

impl RestResource for Message {
    const SCHEMA: &'static ResourceSchema = &MESSAGE;

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl Message {
    /// The Context.IO message id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn message_id(&self) -> Result<Option<String>, ResourceError> {
        self.resource.text("message_id").await
    }

    /// The `Message-ID` header value.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn email_message_id(&self) -> Result<Option<String>, ResourceError> {
        self.resource.text("email_message_id").await
    }

    /// The subject line.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn subject(&self) -> Result<Option<String>, ResourceError> {
        self.resource.text("subject").await
    }

    /// When the message was sent.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn sent(&self) -> Result<Option<DateTime<Utc>>, ResourceError> {
        self.resource.timestamp("sent_at").await
    }

    /// Names of the folders holding this message.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn folders(&self) -> Result<Vec<String>, ResourceError> {
        Ok(self
            .resource
            .attribute_as::<Vec<String>>("folders")
            .await?
            .unwrap_or_default())
    }

    /// The `From` participants.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn from(&self) -> Result<Vec<Address>, ResourceError> {
        self.addresses("from").await
    }

    /// The `To` participants.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn to(&self) -> Result<Vec<Address>, ResourceError> {
        self.addresses("to").await
    }

    /// The `Cc` participants.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn cc(&self) -> Result<Vec<Address>, ResourceError> {
        self.addresses("cc").await
    }

    /// The `Bcc` participants.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn bcc(&self) -> Result<Vec<Address>, ResourceError> {
        self.addresses("bcc").await
    }

    /// The `Reply-To` participants.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the attribute fetch fails.
    pub async fn reply_to(&self) -> Result<Vec<Address>, ResourceError> {
        self.addresses("reply_to").await
    }

    async fn addresses(&self, role: &str) -> Result<Vec<Address>, ResourceError> {
        let Some(Value::Object(addresses)) = self.resource.attribute("addresses").await? else {
            return Ok(Vec::new());
        };

        let entry = addresses
            .get(role)
            .or_else(|| addresses.get(&role.replace('_', "-")))
            .cloned();

        Ok(match entry {
            Some(single @ Value::Object(_)) => list_of(Value::Array(vec![single])),
            Some(many) => list_of(many),
            None => Vec::new(),
        })
    }

    /// The body parts, optionally only those of MIME type `body_type`.
    ///
    /// Served from the `bodies` attribute when the message was scoped with
    /// `include_body`; otherwise fetched once from `/body`. The full list is
    /// cached and filtered on each call.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the fetch fails.
    pub async fn body(&self, body_type: Option<&str>) -> Result<Vec<MessageBody>, ResourceError> {
        let bodies = self
            .cache
            .bodies
            .get_or_try_init(|| async {
                let bodies = if self.includes("include_body") {
                    self.resource.attribute("bodies").await?
                } else {
                    self.sub_resource("/body", "bodies").await?
                };
                Ok::<_, ResourceError>(bodies.map(list_of).unwrap_or_default())
            })
            .await?;

        Ok(bodies
            .iter()
            .filter(|body| body_type.map_or(true, |wanted| body.body_type.as_deref() == Some(wanted)))
            .cloned()
            .collect())
    }

    /// The concatenated `text/plain` parts.
    ///
    /// # Errors
    ///
    /// See [`Message::body`].
    pub async fn body_plain(&self) -> Result<String, ResourceError> {
        self.joined_body("text/plain").await
    }

    /// The concatenated `text/html` parts.
    ///
    /// # Errors
    ///
    /// See [`Message::body`].
    pub async fn body_html(&self) -> Result<String, ResourceError> {
        self.joined_body("text/html").await
    }

    async fn joined_body(&self, body_type: &str) -> Result<String, ResourceError> {
        Ok(self
            .body(Some(body_type))
            .await?
            .into_iter()
            .filter_map(|body| body.content)
            .collect())
    }

    /// The IMAP flags.
    ///
    /// Served from the `flags` attribute when the message was scoped with
    /// `include_flags`; otherwise fetched once from `/flags`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the fetch fails.
    pub async fn flags(&self) -> Result<MessageFlags, ResourceError> {
        self.cache
            .flags
            .get_or_try_init(|| async {
                let flags = if self.includes("include_flags") {
                    self.resource.attribute("flags").await?
                } else {
                    self.sub_resource("/flags", "flags").await?
                };
                Ok::<_, ResourceError>(MessageFlags::from_map(object_or_empty(flags, "flags")))
            })
            .await
            .cloned()
    }

    /// The message headers, keyed by header name.
    ///
    /// Served from the `headers` attribute when the message was scoped with
    /// `include_headers`; otherwise fetched once from `/headers`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the fetch fails.
    pub async fn headers(&self) -> Result<&Attributes, ResourceError> {
        self.cache
            .headers
            .get_or_try_init(|| async {
                let headers = if self.includes("include_headers") {
                    self.resource.attribute("headers").await?
                } else {
                    self.sub_resource("/headers", "headers").await?
                };
                Ok::<_, ResourceError>(object_or_empty(headers, "headers"))
            })
            .await
    }

    /// The raw RFC 822 source. Not cached.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn raw(&self) -> Result<Vec<u8>, ResourceError> {
        self.resource
            .raw_request(HttpMethod::Get, "/raw", &Params::new())
            .await
    }

    /// Marks the message as read and returns the `success` flag.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn mark_read(&self) -> Result<bool, ResourceError> {
        let body = self
            .resource
            .request(HttpMethod::Post, "/read", &Params::new())
            .await?;
        Ok(success_flag(body.as_ref()))
    }

    /// The folder holding this message.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the folder cannot be materialized.
    pub async fn folder(&self) -> Result<Option<Folder>, ResourceError> {
        Ok(self.resource.belongs_to("folder").await?.map(Folder::from))
    }

    /// The message's attachments.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredAssociation`] if the registry
    /// lacks `attachments`.
    pub fn attachments(&self) -> Result<AttachmentCollection, ResourceError> {
        self.resource
            .has_many("attachments")
            .map(AttachmentCollection::from)
    }

    fn includes(&self, constraint: &str) -> bool {
        constraint_enabled(self.resource.with_constraints(), constraint)
    }

    async fn sub_resource(&self, suffix: &str, field: &str) -> Result<Option<Value>, ResourceError> {
        let body = self
            .resource
            .request(HttpMethod::Get, suffix, &Params::new())
            .await?;
        Ok(body.and_then(|mut body| body.get_mut(field).map(Value::take)))
    }
}

fn list_of<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                tracing::warn!(error = %error, "Skipping malformed message entry");
                None
            }
        })
        .collect()
}

fn object_or_empty(value: Option<Value>, field: &str) -> Attributes {
    match value {
        Some(Value::Object(map)) => map,
        None | Some(Value::Null) => Attributes::new(),
        Some(other) => {
            tracing::warn!(field, value = ?other, "Expected an object; treating as empty");
            Attributes::new()
        }
    }
}

/// The messages of one folder.
#[derive(Clone, Debug)]
pub struct MessageCollection(Collection);

impl From<Collection> for MessageCollection {
    fn from(collection: Collection) -> Self {
        Self(collection)
    }
}

impl RestCollection for MessageCollection {
    type Item = Message;
    const SCHEMA: &'static CollectionSchema = &MESSAGES;

    fn collection(&self) -> &Collection {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::lite::testing::{api_with, object, ScriptedTransport};
    use crate::rest::resources::lite::UserCollection;
    use crate::rest::Api;
    use serde_json::json;

    const PATH: &str = "users/u1/email_accounts/primary/folders/Inbox/messages/m1";

    fn message(api: &Api) -> Message {
        UserCollection::root(api)
            .get("u1")
            .email_accounts()
            .unwrap()
            .get("primary")
            .folders()
            .unwrap()
            .get("Inbox")
            .messages()
            .unwrap()
            .get("m1")
    }

    #[test]
    fn test_flags_rename_read_and_default_missing() {
        let flags = MessageFlags::from_map(object(json!({
            "read": true,
            "flagged": 1,
            "$Junk": true
        })));

        assert!(flags.seen);
        assert!(flags.flagged);
        assert!(!flags.answered);
        assert!(!flags.draft);
        assert!(!flags.deleted);
        assert_eq!(flags.other, object(json!({"$Junk": true})));
    }

    #[tokio::test]
    async fn test_flags_fetched_once_from_sub_resource() {
        let transport = ScriptedTransport::new().respond(
            &format!("GET {PATH}/flags"),
            json!({"flags": {"read": false, "answered": true}}),
        );
        let (api, transport) = api_with(transport);
        let message = message(&api);

        let flags = message.flags().await.unwrap();
        assert!(!flags.seen);
        assert!(flags.answered);
        message.flags().await.unwrap();

        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_flags_from_attributes_when_included() {
        let transport = ScriptedTransport::new().respond(
            &format!("GET {PATH}"),
            json!({"message_id": "m1", "flags": {"seen": true}}),
        );
        let (api, transport) = api_with(transport);
        let message = message(&api).with(object(json!({"include_flags": true})));

        assert!(message.flags().await.unwrap().seen);

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].params, object(json!({"include_flags": 1})));
    }

    #[tokio::test]
    async fn test_body_fetched_once_and_filtered_locally() {
        let transport = ScriptedTransport::new().respond(
            &format!("GET {PATH}/body"),
            json!({"bodies": [
                {"type": "text/plain", "content": "Hello "},
                {"type": "text/html", "content": "<p>Hello</p>"},
                {"type": "text/plain", "content": "world"}
            ]}),
        );
        let (api, transport) = api_with(transport);
        let message = message(&api);

        assert_eq!(message.body_plain().await.unwrap(), "Hello world");
        assert_eq!(message.body_html().await.unwrap(), "<p>Hello</p>");
        assert_eq!(message.body(None).await.unwrap().len(), 3);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_body_from_attributes_when_included() {
        let transport = ScriptedTransport::new().respond(
            &format!("GET {PATH}"),
            json!({"message_id": "m1", "bodies": [{"type": "text/plain", "content": "Hi"}]}),
        );
        let (api, transport) = api_with(transport);
        let message = message(&api).with(object(json!({"include_body": 1})));

        assert_eq!(message.body_plain().await.unwrap(), "Hi");
        assert_eq!(transport.count(HttpMethod::Get, &format!("{PATH}/body")), 0);
    }

    #[tokio::test]
    async fn test_addresses_accept_single_or_list() {
        let transport = ScriptedTransport::new().respond(
            &format!("GET {PATH}"),
            json!({"message_id": "m1", "addresses": {
                "from": {"email": "jane@example.com", "name": "Jane"},
                "to": [{"email": "a@example.com"}, {"email": "b@example.com"}]
            }}),
        );
        let (api, _) = api_with(transport);
        let message = message(&api);

        let from = message.from().await.unwrap();
        assert_eq!(from.len(), 1);
        assert_eq!(from[0].name.as_deref(), Some("Jane"));
        assert_eq!(message.to().await.unwrap().len(), 2);
        assert!(message.cc().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_raw_and_mark_read() {
        let transport = ScriptedTransport::new()
            .respond_raw(&format!("GET {PATH}/raw"), b"From: jane@example.com\r\n\r\nHi")
            .respond(&format!("POST {PATH}/read"), json!({"success": true}));
        let (api, _) = api_with(transport);
        let message = message(&api);

        assert!(message.raw().await.unwrap().starts_with(b"From:"));
        assert!(message.mark_read().await.unwrap());
    }

    #[tokio::test]
    async fn test_headers_memoized() {
        let transport = ScriptedTransport::new().respond(
            &format!("GET {PATH}/headers"),
            json!({"headers": {"Subject": "Hi", "Received": ["a", "b"]}}),
        );
        let (api, transport) = api_with(transport);
        let message = message(&api);

        assert_eq!(message.headers().await.unwrap()["Subject"], json!("Hi"));
        assert_eq!(message.headers().await.unwrap().len(), 2);
        assert_eq!(transport.calls().len(), 1);
    }
}
