//! Path computation for resources and collections.
//!
//! The [`UrlBuilder`] holds one [`UrlRule`] per concrete type, keyed by the
//! type's association name. A rule is a pure function of the instance's
//! identity and its parent chain: nested types append their own segment to
//! the parent's path, which in turn asks its own parent, up to the root
//! collection.
//!
//! Segments taken from identities (labels, folder names, message ids) are
//! percent-encoded, so a label of `a/b` becomes `a%2Fb`.
//!
//! # Example
//!
//! ```rust
//! use contextio_lite::rest::{encode_segment, UrlBuilder};
//! use serde_json::json;
//!
//! let mut urls = UrlBuilder::new();
//! urls.register("users", |_| Ok("users".to_string()));
//!
//! assert!(urls.is_registered("users"));
//! assert_eq!(encode_segment(&json!("a/b")), "a%2Fb");
//! assert_eq!(encode_segment(&json!(42)), "42");
//! ```

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::rest::collection::Collection;
use crate::rest::resource::Resource;
use crate::rest::ResourceError;

/// A resource or collection whose path is being computed.
#[derive(Clone, Copy, Debug)]
pub enum UrlTarget<'a> {
    /// A singular resource.
    Resource(&'a Resource),
    /// A collection.
    Collection(&'a Collection),
}

impl<'a> UrlTarget<'a> {
    /// Returns the association name of the target's type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resource(resource) => resource.schema().name,
            Self::Collection(collection) => collection.schema().name,
        }
    }

    /// Returns the parent registered under `association`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAssociation`] if the target was built
    /// without that parent.
    pub fn parent(&self, association: &'static str) -> Result<&'a Resource, ResourceError> {
        let parent = match self {
            Self::Resource(resource) => resource.parent(),
            Self::Collection(collection) => collection.parent(),
        };

        parent
            .filter(|parent| parent.schema().name == association)
            .ok_or(ResourceError::MissingAssociation {
                resource: self.name(),
                association,
            })
    }

    /// Returns the encoded primary key of a resource target.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingIdentity`] if the key is not known
    /// locally, or if the target is a collection.
    pub fn identity(&self) -> Result<String, ResourceError> {
        match self {
            Self::Resource(resource) => resource
                .known(resource.primary_key())
                .filter(|value| !value.is_null())
                .map(|value| encode_segment(&value))
                .ok_or(ResourceError::MissingIdentity {
                    resource: resource.schema().name,
                    primary_key: resource.primary_key(),
                }),
            Self::Collection(collection) => Err(ResourceError::MissingIdentity {
                resource: collection.schema().name,
                primary_key: "resource_url",
            }),
        }
    }
}

/// Computes the path of one concrete type.
pub type UrlRule = fn(UrlTarget<'_>) -> Result<String, ResourceError>;

/// Registration table of [`UrlRule`]s.
#[derive(Clone, Default)]
pub struct UrlBuilder {
    rules: HashMap<&'static str, UrlRule>,
}

impl fmt::Debug for UrlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.rules.keys().collect();
        names.sort();
        f.debug_struct("UrlBuilder").field("rules", &names).finish()
    }
}

impl UrlBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rule for the type named `name`, replacing any earlier one.
    pub fn register(&mut self, name: &'static str, rule: UrlRule) {
        self.rules.insert(name, rule);
    }

    /// Returns `true` if a rule exists for `name`.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Computes the path for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredUrl`] if no rule is registered
    /// for the target's type, or whatever the rule itself reports.
    pub fn url_for(&self, target: UrlTarget<'_>) -> Result<String, ResourceError> {
        let name = target.name();
        let rule = self
            .rules
            .get(name)
            .ok_or(ResourceError::UnregisteredUrl { resource: name })?;
        rule(target)
    }
}

/// Percent-encodes a path segment. Non-string values use their JSON text.
#[must_use]
pub fn encode_segment(value: &Value) -> String {
    match value {
        Value::String(s) => urlencoding::encode(s).into_owned(),
        other => urlencoding::encode(&other.to_string()).into_owned(),
    }
}

/// Path of a top-level member: `<segment>/<identity>`.
///
/// # Errors
///
/// Propagates [`UrlTarget::identity`] failures.
pub fn root_member(target: UrlTarget<'_>, segment: &str) -> Result<String, ResourceError> {
    Ok(format!("{segment}/{}", target.identity()?))
}

/// Path of a collection nested under `parent`: `<parent path>/<segment>`.
///
/// # Errors
///
/// Propagates missing-parent and parent path failures.
pub fn nested_collection(
    target: UrlTarget<'_>,
    parent: &'static str,
    segment: &str,
) -> Result<String, ResourceError> {
    let parent_url = target.parent(parent)?.resource_url()?;
    Ok(format!("{}/{segment}", parent_url.trim_end_matches('/')))
}

/// Path of a member nested under `parent`: `<parent path>/<segment>/<identity>`.
///
/// # Errors
///
/// Propagates missing-parent, parent path and identity failures.
pub fn nested_member(
    target: UrlTarget<'_>,
    parent: &'static str,
    segment: &str,
) -> Result<String, ResourceError> {
    let identity = target.identity()?;
    Ok(format!(
        "{}/{identity}",
        nested_collection(target, parent, segment)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_segment_escapes_reserved_characters() {
        assert_eq!(encode_segment(&json!("a/b")), "a%2Fb");
        assert_eq!(encode_segment(&json!("[Gmail]/All Mail")), "%5BGmail%5D%2FAll%20Mail");
        assert_eq!(
            encode_segment(&json!("<abc@mail.example.com>")),
            "%3Cabc%40mail.example.com%3E"
        );
        assert_eq!(encode_segment(&json!("Inbox")), "Inbox");
    }

    #[test]
    fn test_encode_segment_numbers() {
        assert_eq!(encode_segment(&json!(7)), "7");
    }

    #[test]
    fn test_register_and_count() {
        let mut urls = UrlBuilder::new();
        assert!(urls.is_empty());

        urls.register("users", |_| Ok("users".to_string()));
        urls.register("users", |_| Ok("people".to_string()));

        assert_eq!(urls.len(), 1);
        assert!(urls.is_registered("users"));
        assert!(!urls.is_registered("user"));
    }
}
