//! Mayday Resource Views
//!
//! This crate decides what a requesting principal is allowed to see. It takes
//! rows the data layer already fetched, consults the resource type's declared
//! schema and the principal's permission grants, and produces JSON:API
//! documents in which every invisible field is an explicit `null`.
//!
//! Visibility is tiered, and the tiers are deliberately non-cumulative:
//!
//! - `self` fields show only on records the principal owns
//! - `group` fields show only to holders of the type's read permission
//! - `internal` fields show only to holders of the type's internal permission
//!
//! An anonymous request is served the same document shape with every guarded
//! value nulled; authorization failures never become errors here.
//!
//! # Architecture
//!
//! - [`schema`] - Declarative per-type attribute and relationship tables
//! - [`access`] - Principals and per-record tier evaluation
//! - [`view`] - The serializer binding schema, query, and principal
//! - [`resources`] - The dispatch API's shipped schemas
//!
//! # Quick Start
//!
//! ```
//! use mayday_query::{PageConfig, RawParams, ResourceQuery};
//! use mayday_view::access::Principal;
//! use mayday_view::resources::default_registry;
//! use mayday_view::view::ResourceView;
//! use serde_json::json;
//!
//! let registry = default_registry();
//! let params = RawParams::from_query_str("fields[rescues]=client,status");
//! let query = ResourceQuery::compile(&params, &PageConfig::default(), None).unwrap();
//! let principal = Principal::anonymous();
//!
//! let view = ResourceView::for_type("rescues", &registry, &query, Some(&principal)).unwrap();
//! let record = json!({"id": "7f2f2a06-58fb-4fd8-9182-8b4fcb8e2b5a", "status": "open"});
//! let resource = view.render(&record);
//! assert_eq!(resource.kind, "rescues");
//! ```

#![warn(missing_docs)]

pub mod access;
pub mod resources;
pub mod schema;
pub mod view;

pub use access::{Access, Principal, qualifying_access};
pub use schema::{
    AttributeDef, AttributeTransform, RelationKind, RelationshipDef, ResourceSchema,
    SchemaRegistry,
};
pub use view::ResourceView;
