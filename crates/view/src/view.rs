//! The resource serializer.
//!
//! A [`ResourceView`] binds one resource type's schema to one request's
//! compiled query and principal, and turns rows the data layer already
//! fetched into JSON:API documents. Two rules govern every attribute:
//!
//! 1. The sparse fieldset decides whether the key appears at all. An
//!    attribute excluded by `fields[<type>]` is omitted before any
//!    permission check runs.
//! 2. The tier check decides whether the value is shown. A surviving key the
//!    principal does not qualify for is rendered as an explicit `null`, so
//!    response shapes stay stable across permission levels.
//!
//! Relationships appear only when the request's `include` paths name them
//! and the principal passes the relationship's own tier. Included resources
//! are rendered through their own type's schema against the same principal,
//! then deduplicated by `(type, id)` across the whole document.

use std::collections::HashSet;

use mayday_jsonapi::document::{
    Document, PageMeta, Relationship, ResourceIdentifier, ResourceObject,
};
use mayday_jsonapi::sort::SortKey;
use mayday_query::ResourceQuery;
use serde_json::Value;
use tracing::debug;

use crate::access::{Principal, qualifying_access};
use crate::schema::{RelationKind, RelationshipDef, ResourceSchema, SchemaRegistry};

/// Serializes rows of one resource type for one request.
pub struct ResourceView<'a> {
    schema: &'a ResourceSchema,
    registry: &'a SchemaRegistry,
    query: &'a ResourceQuery,
    principal: Option<&'a Principal>,
}

impl<'a> ResourceView<'a> {
    /// Creates a view bound to one request.
    ///
    /// Returns `None` when `resource_type` is not registered; callers treat
    /// that the same as a type that does not exist.
    pub fn for_type(
        resource_type: &str,
        registry: &'a SchemaRegistry,
        query: &'a ResourceQuery,
        principal: Option<&'a Principal>,
    ) -> Option<Self> {
        let schema = registry.get(resource_type)?;
        Some(ResourceView {
            schema,
            registry,
            query,
            principal,
        })
    }

    /// The schema this view serializes through.
    pub fn schema(&self) -> &ResourceSchema {
        self.schema
    }

    /// The sort to hand the data layer: the request's `order` keys, or the
    /// schema's default when the request named none.
    pub fn effective_sort(&self) -> Vec<SortKey> {
        if !self.query.sort.is_empty() {
            return self.query.sort.clone();
        }
        self.schema.default_sort.clone().unwrap_or_default()
    }

    /// Serializes one record into a resource object.
    pub fn render(&self, record: &Value) -> ResourceObject {
        let mut sink = IncludeSink::default();
        self.render_into(record, &self.query.include, &mut sink)
    }

    /// Serializes a fetched collection into a complete document.
    ///
    /// `meta` carries the pagination counts when the caller knows them.
    pub fn render_collection(&self, records: &[Value], meta: Option<PageMeta>) -> Document {
        let mut sink = IncludeSink::default();
        let data: Vec<ResourceObject> = records
            .iter()
            .map(|record| self.render_into(record, &self.query.include, &mut sink))
            .collect();

        debug!(
            resource_type = %self.schema.resource_type,
            records = data.len(),
            included = sink.resources.len(),
            "serialized collection document"
        );

        let mut document = Document::collection(data).with_included(sink.resources);
        if let Some(meta) = meta {
            document = document.with_meta(meta.to_map());
        }
        document
    }

    /// Serializes a single fetched record (or a miss) into a document.
    pub fn render_single(&self, record: Option<&Value>) -> Document {
        let mut sink = IncludeSink::default();
        let data = record.map(|r| self.render_into(r, &self.query.include, &mut sink));
        Document::single(data).with_included(sink.resources)
    }

    /// Renders one record, collecting included resources along `paths`.
    fn render_into(
        &self,
        record: &Value,
        paths: &[String],
        sink: &mut IncludeSink,
    ) -> ResourceObject {
        let access = qualifying_access(self.principal, record, self.schema);
        let kind = &self.schema.resource_type;
        let mut resource = ResourceObject::new(kind.clone(), record_id(record));

        for def in &self.schema.attributes {
            if !self.query.field_requested(kind, &def.name) {
                // sparse fieldsets remove the key entirely, tier never runs
                continue;
            }
            if access.grants(self.schema.attribute_tier(def)) {
                let raw = record.get(&def.name).cloned().unwrap_or(Value::Null);
                let value = match def.transform {
                    Some(transform) => transform(&raw),
                    None => raw,
                };
                resource.attributes.insert(def.name.clone(), value);
            } else {
                resource.attributes.insert(def.name.clone(), Value::Null);
            }
        }

        for def in &self.schema.relationships {
            if !paths_name(paths, &def.name) {
                continue;
            }
            if !access.grants(self.schema.relationship_tier(def)) {
                continue;
            }
            resource
                .relationships
                .insert(def.name.clone(), self.linkage(record, def));
            self.descend(record, def, &include_tails(paths, &def.name), sink);
        }

        resource
    }

    /// Builds the `{data}` linkage for a relationship from the nested rows.
    fn linkage(&self, record: &Value, def: &RelationshipDef) -> Relationship {
        match def.kind {
            RelationKind::ToOne => {
                let target = record
                    .get(&def.name)
                    .filter(|row| !row.is_null())
                    .map(|row| ResourceIdentifier::new(def.related_type.clone(), record_id(row)));
                Relationship::to_one(target)
            }
            RelationKind::ToMany => {
                let targets = record
                    .get(&def.name)
                    .and_then(Value::as_array)
                    .map(|rows| {
                        rows.iter()
                            .map(|row| {
                                ResourceIdentifier::new(def.related_type.clone(), record_id(row))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Relationship::to_many(targets)
            }
        }
    }

    /// Renders the nested rows of one relationship into the include sink,
    /// continuing along the remaining dotted path segments.
    fn descend(
        &self,
        record: &Value,
        def: &RelationshipDef,
        tails: &[String],
        sink: &mut IncludeSink,
    ) {
        let Some(related_schema) = self.registry.get(&def.related_type) else {
            // a relationship can point at a type nobody registered; skip it
            return;
        };
        let related_view = ResourceView {
            schema: related_schema,
            registry: self.registry,
            query: self.query,
            principal: self.principal,
        };
        for row in nested_rows(record, &def.name) {
            if !row.is_object() {
                // bare-id linkage carries nothing worth including
                continue;
            }
            let rendered = related_view.render_into(row, tails, sink);
            sink.push(rendered);
        }
    }
}

/// The nested row or rows stored under a relationship's record field.
fn nested_rows<'v>(record: &'v Value, name: &str) -> Vec<&'v Value> {
    match record.get(name) {
        Some(Value::Array(rows)) => rows.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(row) => vec![row],
    }
}

/// The `id` of a row, tolerating object rows and bare-id linkage.
fn record_id(row: &Value) -> String {
    match row {
        Value::String(id) => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => match row.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => String::new(),
        },
    }
}

/// Whether any dotted path names `name` as its head segment.
fn paths_name(paths: &[String], name: &str) -> bool {
    paths.iter().any(|path| {
        path == name
            || path
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// The dotted tails of every path headed by `name`.
fn include_tails(paths: &[String], name: &str) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| {
            path.strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(String::from)
        })
        .collect()
}

/// Accumulates included resources, deduplicated by `(type, id)`.
#[derive(Default)]
struct IncludeSink {
    seen: HashSet<(String, String)>,
    resources: Vec<ResourceObject>,
}

impl IncludeSink {
    fn push(&mut self, resource: ResourceObject) {
        if resource.id.is_empty() {
            // a row without an id cannot be linked to
            return;
        }
        let key = (resource.kind.clone(), resource.id.clone());
        if self.seen.insert(key) {
            self.resources.push(resource);
        }
    }
}
