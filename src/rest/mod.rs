//! Resource and collection modeling for the Context.IO Lite API.
//!
//! This module turns declarative descriptions of the REST hierarchy into
//! working objects:
//!
//! - **[`ResourceSchema`] / [`CollectionSchema`]**: static per-type
//!   descriptors (primary key, association name, lazy fields, parents and
//!   children)
//! - **[`AssociationRegistry`]**: resolves association names to schemas
//! - **[`UrlBuilder`]**: one path rule per type, walking the parent chain
//! - **[`Resource`]**: lazy attribute fetch, `with` constraints, deletion,
//!   belongs-to and has-many materialization
//! - **[`Collection`]**: lazy listing, `where` filtering, keyed access and
//!   creation
//! - **[`RestResource`] / [`RestCollection`]**: the traits typed wrappers
//!   implement
//! - **[`ResourceError`]**: errors for all of the above
//!
//! The concrete Lite types live in [`resources::lite`].
//!
//! # Example
//!
//! ```rust,ignore
//! use contextio_lite::rest::{RestCollection, RestResource};
//!
//! let users = contextio.users();
//!
//! // Lists once, then wraps each record into a `User`
//! for user in users.to_vec().await? {
//!     let accounts = user.email_accounts()?;
//!     println!("{:?} has {} accounts", user.id().await?, accounts.size().await?);
//! }
//!
//! // Keyed access never touches the network
//! let user = users.get("4f1c8e2a");
//! let folders = user.email_accounts()?.get("jane::gmail").folders()?;
//! ```

mod api;
mod collection;
mod errors;
mod registry;
mod resource;
mod schema;
mod url_builder;

pub mod resources;

// Public exports
pub use api::{success_flag, Api};
pub use collection::{Collection, CollectionOptions, RestCollection};
pub use errors::ResourceError;
pub use registry::{Association, AssociationRegistry};
pub use resource::{Resource, ResourceOptions, RestResource, RESOURCE_URL};
pub use schema::{
    constraint_enabled, merge_constraints, normalize_attributes, normalize_constraints,
    normalize_key, truthy, Attributes, CollectionSchema, ResourceSchema,
};
pub use url_builder::{
    encode_segment, nested_collection, nested_member, root_member, UrlBuilder, UrlRule, UrlTarget,
};
