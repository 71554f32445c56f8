//! Association name resolution.
//!
//! Resources refer to their relatives by association name (`"folders"`,
//! `"email_account"`). The [`AssociationRegistry`] maps those names to the
//! schemas that implement them, so no type needs compile-time knowledge of
//! its siblings.
//!
//! The registry is an explicit value: it is populated once at startup (see
//! [`resources::lite::associations`](crate::rest::resources::lite::associations))
//! and then shared read-only through the [`Api`](crate::rest::Api) handle.
//!
//! # Example
//!
//! ```rust
//! use contextio_lite::rest::{Association, AssociationRegistry};
//! use contextio_lite::rest::resources::lite::{FOLDER, FOLDERS};
//!
//! let mut registry = AssociationRegistry::new();
//! registry.register_resource(&FOLDER);
//! registry.register_collection(&FOLDERS);
//!
//! assert!(matches!(registry.resolve("folders"), Some(Association::Collection(_))));
//! assert!(registry.resolve("widgets").is_none());
//! ```

use std::collections::HashMap;

use crate::rest::schema::{CollectionSchema, ResourceSchema};
use crate::rest::ResourceError;

/// What an association name resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Association {
    /// A singular resource type (belongs-to).
    Resource(&'static ResourceSchema),
    /// A collection type (has-many).
    Collection(&'static CollectionSchema),
}

impl Association {
    /// Returns the association name of the target type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Resource(schema) => schema.name,
            Self::Collection(schema) => schema.name,
        }
    }
}

/// Maps association names to resource and collection schemas.
#[derive(Clone, Debug, Default)]
pub struct AssociationRegistry {
    associations: HashMap<&'static str, Association>,
}

impl AssociationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `association`, replacing any earlier binding.
    pub fn register(&mut self, name: &'static str, association: Association) {
        tracing::trace!(name, "Registering association");
        self.associations.insert(name, association);
    }

    /// Registers a resource schema under its own name.
    pub fn register_resource(&mut self, schema: &'static ResourceSchema) {
        self.register(schema.name, Association::Resource(schema));
    }

    /// Registers a collection schema under its own name.
    pub fn register_collection(&mut self, schema: &'static CollectionSchema) {
        self.register(schema.name, Association::Collection(schema));
    }

    /// Looks up an association name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Association> {
        self.associations.get(name).copied()
    }

    /// Resolves `name` to a resource schema.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredAssociation`] if the name is
    /// unknown or bound to a collection.
    pub fn resource(&self, name: &str) -> Result<&'static ResourceSchema, ResourceError> {
        match self.resolve(name) {
            Some(Association::Resource(schema)) => Ok(schema),
            _ => Err(ResourceError::UnregisteredAssociation {
                name: name.to_string(),
            }),
        }
    }

    /// Resolves `name` to a collection schema.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnregisteredAssociation`] if the name is
    /// unknown or bound to a resource.
    pub fn collection(&self, name: &str) -> Result<&'static CollectionSchema, ResourceError> {
        match self.resolve(name) {
            Some(Association::Collection(schema)) => Ok(schema),
            _ => Err(ResourceError::UnregisteredAssociation {
                name: name.to_string(),
            }),
        }
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.associations.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }
}
