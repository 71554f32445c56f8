//! Concrete resource and collection types.
//!
//! Types are organized by API version, the way Context.IO versions its
//! paths:
//!
//! ```text
//! resources/
//!   mod.rs       <- This file
//!   lite/
//!     mod.rs     <- Schemas, URL rules and registration for the Lite API
//! ```
//!
//! # Using Resources
//!
//! ```rust,ignore
//! use contextio_lite::rest::resources::lite::{User, UserCollection};
//! use contextio_lite::rest::{RestCollection, RestResource};
//!
//! let user: User = contextio.users().get("4f1c8e2a");
//! println!("{:?}", user.email_addresses().await?);
//! ```

pub mod lite;
