//! The query compiler and its output descriptor.
//!
//! [`ResourceQuery::compile`] is the single entry point: it scans the raw
//! parameter bag once and produces an immutable descriptor of everything the
//! data layer needs. Compilation is a pure function of the bag and the
//! pagination config; compiling the same request twice yields equal
//! descriptors.

use std::collections::{HashMap, HashSet};

use mayday_jsonapi::sort::SortKey;
use tracing::debug;

use crate::config::PageConfig;
use crate::error::QueryResult;
use crate::filter::Filter;
use crate::page::PageParams;
use crate::params::RawParams;

/// A compiled, validated query descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQuery {
    /// Rows to skip.
    pub offset: u64,
    /// Maximum rows to return.
    pub limit: u64,
    /// Sort keys in priority order. Empty when the request named no order
    /// and the resource declares no default.
    pub sort: Vec<SortKey>,
    /// Sparse fieldsets: resource type name to the attribute names the
    /// client asked for. A type with no entry is unrestricted.
    pub fields: HashMap<String, HashSet<String>>,
    /// Relationship include paths (dotted), deduplicated, in request order.
    pub include: Vec<String>,
    /// The filter predicate; [`Filter::empty`] when none was supplied.
    pub filter: Filter,
}

impl ResourceQuery {
    /// Compiles a request's query parameters.
    ///
    /// `default_sort` is applied only when the request carries no `order`
    /// parameter; pass the resource type's declared default, or `None` to
    /// leave the order unspecified.
    pub fn compile(
        params: &RawParams,
        config: &PageConfig,
        default_sort: Option<&[SortKey]>,
    ) -> QueryResult<Self> {
        let window = PageParams::scan(params)?.resolve(config)?;

        let mut fields: HashMap<String, HashSet<String>> = HashMap::new();
        for (kind, list) in params.bracketed("fields") {
            let set = fields.entry(kind.to_string()).or_default();
            set.extend(comma_list(list).map(String::from));
        }

        let sort = match params.get("order") {
            Some(raw) => comma_list(raw).map(SortKey::parse).collect(),
            None => default_sort.map(<[SortKey]>::to_vec).unwrap_or_default(),
        };

        let mut include: Vec<String> = Vec::new();
        if let Some(raw) = params.get("include") {
            for path in comma_list(raw) {
                if !include.iter().any(|seen| seen == path) {
                    include.push(path.to_string());
                }
            }
        }

        let filter = match params.get("filter") {
            Some(raw) => Filter::parse_param(raw)?,
            None => Filter::empty(),
        };

        debug!(
            offset = window.offset,
            limit = window.limit,
            sort_keys = sort.len(),
            include_paths = include.len(),
            restricted_types = fields.len(),
            filtered = !filter.is_empty(),
            "compiled resource query"
        );

        Ok(ResourceQuery {
            offset: window.offset,
            limit: window.limit,
            sort,
            fields,
            include,
            filter,
        })
    }

    /// Whether the sparse fieldset for `kind` admits `field`.
    ///
    /// A type the request never restricted admits every field.
    pub fn field_requested(&self, kind: &str, field: &str) -> bool {
        self.fields
            .get(kind)
            .is_none_or(|requested| requested.contains(field))
    }
}

/// Splits a comma list, trimming whitespace and dropping empty tokens.
fn comma_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
