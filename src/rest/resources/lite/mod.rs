//! Context.IO Lite resources.
//!
//! The Lite hierarchy is strictly nested:
//!
//! ```text
//! users/{id}
//! ├── email_accounts/{label}
//! │   └── folders/{name}
//! │       └── messages/{message_id}
//! │           └── attachments/{attachment_id}
//! └── webhooks/{webhook_id}
//! ```
//!
//! Each level has a typed resource and collection. [`associations`] and
//! [`url_builder`] produce the registries an [`Api`](crate::rest::Api) needs
//! to wire them together.

mod attachment;
mod email_account;
mod folder;
mod message;
mod user;
mod webhook;

#[cfg(test)]
pub(crate) mod testing;

pub use attachment::{Attachment, AttachmentCollection, ATTACHMENT, ATTACHMENTS};
pub use email_account::{
    EmailAccount, EmailAccountCollection, NewEmailAccount, EMAIL_ACCOUNT, EMAIL_ACCOUNTS,
};
pub use folder::{Folder, FolderCollection, FOLDER, FOLDERS};
pub use message::{Address, Message, MessageBody, MessageCollection, MessageFlags, MESSAGE, MESSAGES};
pub use user::{User, UserCollection, USER, USERS};
pub use webhook::{Webhook, WebhookCollection, WEBHOOK, WEBHOOKS};

use crate::rest::{AssociationRegistry, UrlBuilder};

/// Builds the registry resolving every Lite association name.
#[must_use]
pub fn associations() -> AssociationRegistry {
    let mut registry = AssociationRegistry::new();

    for schema in [&USER, &EMAIL_ACCOUNT, &FOLDER, &MESSAGE, &ATTACHMENT, &WEBHOOK] {
        registry.register_resource(schema);
    }
    for schema in [&USERS, &EMAIL_ACCOUNTS, &FOLDERS, &MESSAGES, &ATTACHMENTS, &WEBHOOKS] {
        registry.register_collection(schema);
    }

    registry
}

/// Builds the path rules of every Lite type.
#[must_use]
pub fn url_builder() -> UrlBuilder {
    let mut urls = UrlBuilder::new();

    urls.register(USERS.name, user::users_url);
    urls.register(USER.name, user::user_url);
    urls.register(EMAIL_ACCOUNTS.name, email_account::email_accounts_url);
    urls.register(EMAIL_ACCOUNT.name, email_account::email_account_url);
    urls.register(FOLDERS.name, folder::folders_url);
    urls.register(FOLDER.name, folder::folder_url);
    urls.register(MESSAGES.name, message::messages_url);
    urls.register(MESSAGE.name, message::message_url);
    urls.register(ATTACHMENTS.name, attachment::attachments_url);
    urls.register(ATTACHMENT.name, attachment::attachment_url);
    urls.register(WEBHOOKS.name, webhook::webhooks_url);
    urls.register(WEBHOOK.name, webhook::webhook_url);

    urls
}
