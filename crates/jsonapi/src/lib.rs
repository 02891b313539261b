//! Mayday JSON:API Document Model
//!
//! This crate provides the wire-level building blocks shared by the Mayday
//! dispatch API: JSON:API document and resource-object shapes, sort-order
//! primitives, permission tiers, and error objects. It contains no request
//! handling and no storage logic; the query compiler ([`mayday-query`]) and
//! the serialization layer ([`mayday-view`]) both build on the types here.
//!
//! # Architecture
//!
//! The crate is organized into four modules:
//!
//! - [`document`] - Resource objects, relationships, and complete documents
//! - [`sort`] - Sort keys and direction tokens
//! - [`tier`] - Read-permission tiers for field visibility
//! - [`error`] - JSON:API error objects and error documents
//!
//! # Quick Start
//!
//! ```
//! use mayday_jsonapi::document::{Document, ResourceObject};
//! use mayday_jsonapi::sort::SortKey;
//!
//! let resource = ResourceObject::new("rescues", "a917c1f6-8e9d-4336-9faf-3247eb4382b0");
//! let document = Document::single(Some(resource));
//! assert!(serde_json::to_string(&document).is_ok());
//!
//! let key = SortKey::parse("-createdAt");
//! assert_eq!(key.field, "createdAt");
//! ```
//!
//! [`mayday-query`]: https://docs.rs/mayday-query
//! [`mayday-view`]: https://docs.rs/mayday-view

#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod sort;
pub mod tier;

pub use document::{
    Document, PageMeta, PrimaryData, Relationship, RelationshipData, ResourceIdentifier,
    ResourceObject,
};
pub use error::{ErrorDocument, ErrorObject, ErrorSource};
pub use sort::{SortKey, SortOrder};
pub use tier::PermissionTier;
