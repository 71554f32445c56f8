//! Declarative schemas for resources and collections.
//!
//! Every concrete type in [`resources::lite`](crate::rest::resources::lite)
//! describes itself with a static [`ResourceSchema`] or [`CollectionSchema`].
//! The generic [`Resource`](crate::rest::Resource) and
//! [`Collection`](crate::rest::Collection) engines read these descriptors
//! instead of carrying per-type code.
//!
//! # Example
//!
//! ```rust
//! use contextio_lite::rest::{CollectionSchema, ResourceSchema};
//!
//! static NOTE: ResourceSchema = ResourceSchema {
//!     name: "note",
//!     primary_key: "note_id",
//!     lazy_attributes: &["title", "body"],
//!     belongs_to: &["user"],
//!     has_many: &[],
//! };
//!
//! static NOTES: CollectionSchema = CollectionSchema {
//!     name: "notes",
//!     resource: &NOTE,
//!     belongs_to: &["user"],
//! };
//!
//! assert!(NOTE.declares("title"));
//! assert_eq!(NOTES.resource.primary_key, "note_id");
//! ```

use serde_json::Value;

/// Attribute map of a resource, keyed by field name.
pub type Attributes = serde_json::Map<String, Value>;

/// Describes a singular resource type.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceSchema {
    /// Association name the type registers under (e.g., `"email_account"`).
    pub name: &'static str,
    /// Field that addresses the resource under its parent (e.g., `"label"`).
    pub primary_key: &'static str,
    /// Fields read from the detail fetch when not supplied up front.
    pub lazy_attributes: &'static [&'static str],
    /// Association names of single related resources.
    pub belongs_to: &'static [&'static str],
    /// Association names of related collections.
    pub has_many: &'static [&'static str],
}

impl ResourceSchema {
    /// Returns `true` if `field` is a declared lazy attribute.
    #[must_use]
    pub fn declares(&self, field: &str) -> bool {
        self.lazy_attributes.contains(&field)
    }

    /// Returns `true` if `name` is a declared belongs-to association.
    #[must_use]
    pub fn belongs_to_includes(&self, name: &str) -> bool {
        self.belongs_to.contains(&name)
    }

    /// Returns `true` if `name` is a declared has-many association.
    #[must_use]
    pub fn has_many_includes(&self, name: &str) -> bool {
        self.has_many.contains(&name)
    }
}

/// Describes a collection type.
#[derive(Debug, PartialEq, Eq)]
pub struct CollectionSchema {
    /// Association name the type registers under (e.g., `"folders"`).
    pub name: &'static str,
    /// Schema of the resources the collection yields.
    pub resource: &'static ResourceSchema,
    /// Association names of the parents the collection is scoped under.
    pub belongs_to: &'static [&'static str],
}

/// Rewrites server field names into accessor form (`-` becomes `_`).
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
}

/// Normalizes every key of an attribute map with [`normalize_key`].
#[must_use]
pub fn normalize_attributes(attributes: Attributes) -> Attributes {
    attributes
        .into_iter()
        .map(|(key, value)| (normalize_key(&key), value))
        .collect()
}

/// Converts boolean constraint values to `1`/`0`, leaving others untouched.
#[must_use]
pub fn normalize_constraints(constraints: Attributes) -> Attributes {
    constraints
        .into_iter()
        .map(|(key, value)| match value {
            Value::Bool(flag) => (key, Value::from(u8::from(flag))),
            other => (key, other),
        })
        .collect()
}

/// Layers `constraints` over `existing`; later keys win.
#[must_use]
pub fn merge_constraints(existing: &Attributes, constraints: Attributes) -> Attributes {
    let mut merged = existing.clone();
    merged.extend(normalize_constraints(constraints));
    merged
}

/// Returns `true` if a constraint is switched on (`1`, `true` or `"1"`).
#[must_use]
pub fn constraint_enabled(constraints: &Attributes, name: &str) -> bool {
    match constraints.get(name) {
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => s == "1",
        _ => false,
    }
}

/// Truthiness of an API value: `null`, `false`, `0`, `""` and `"0"` are false.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(_) | Value::Object(_) => true,
    }
}
