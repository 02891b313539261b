//! Mayday Query Compiler
//!
//! This crate turns the untrusted query string of a JSON:API request into a
//! validated, immutable query descriptor. It understands the five parameter
//! families the dispatch API accepts:
//!
//! - **Pagination**: `page[number]`/`page[size]` or raw `page[offset]`/`page[limit]`
//! - **Sorting**: `order` as a comma list with `-` prefixes for descending keys
//! - **Sparse fieldsets**: `fields[<type>]` comma lists per resource type
//! - **Includes**: `include` as a comma list of dotted relationship paths
//! - **Filtering**: `filter` as a JSON predicate document
//!
//! Compilation never touches a database. The output ([`ResourceQuery`]) is a
//! plain description of offsets, limits, sort keys, and a typed predicate
//! tree that the data layer binds as parameters; no request text is ever
//! spliced into SQL.
//!
//! # Architecture
//!
//! - [`params`] - The raw parameter bag handed over by the transport layer
//! - [`page`] - Pagination scanning and window resolution
//! - [`filter`] - The `filter` predicate grammar
//! - [`query`] - The compiler and its output descriptor
//! - [`config`] - Pagination defaults and ceilings
//! - [`error`] - Compilation failures and their wire form
//!
//! # Quick Start
//!
//! ```
//! use mayday_query::{PageConfig, RawParams, ResourceQuery};
//!
//! let params = RawParams::from_query_str("page[number]=2&page[size]=25&order=-createdAt");
//! let query = ResourceQuery::compile(&params, &PageConfig::default(), None).unwrap();
//! assert_eq!(query.offset, 50);
//! assert_eq!(query.limit, 25);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod filter;
pub mod page;
pub mod params;
pub mod query;

pub use config::PageConfig;
pub use error::{QueryError, QueryResult};
pub use filter::{Comparison, Filter, FilterTerm};
pub use page::{PageParams, PageWindow};
pub use params::RawParams;
pub use query::ResourceQuery;
