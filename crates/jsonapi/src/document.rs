//! JSON:API document and resource-object shapes.
//!
//! These types model the subset of the JSON:API wire format the dispatch API
//! speaks: resource objects with `type`/`id`/`attributes`/`relationships`,
//! relationship linkage, and top-level documents with `data`, `included`, and
//! `meta` members. Everything here is plain data; how a record's fields end
//! up in `attributes` is decided by the serialization layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `{type, id}` pair identifying one resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// The resource type's wire name.
    #[serde(rename = "type")]
    pub kind: String,
    /// The resource's identifier.
    pub id: String,
}

impl ResourceIdentifier {
    /// Creates an identifier.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        ResourceIdentifier {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Resource linkage carried by a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// Linkage of a to-one relationship; `None` serializes as `null`.
    One(Option<ResourceIdentifier>),
    /// Linkage of a to-many relationship.
    Many(Vec<ResourceIdentifier>),
}

/// A named relationship entry on a resource object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// The linkage data.
    pub data: RelationshipData,
}

impl Relationship {
    /// Creates a to-one relationship entry.
    pub fn to_one(target: Option<ResourceIdentifier>) -> Self {
        Relationship {
            data: RelationshipData::One(target),
        }
    }

    /// Creates a to-many relationship entry.
    pub fn to_many(targets: Vec<ResourceIdentifier>) -> Self {
        Relationship {
            data: RelationshipData::Many(targets),
        }
    }
}

/// A serialized resource.
///
/// `attributes` preserves insertion order, so documents come out with fields
/// in the order the resource schema declares them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    /// The resource type's wire name.
    #[serde(rename = "type")]
    pub kind: String,
    /// The resource's identifier.
    pub id: String,
    /// Attribute values visible to the requesting principal.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    /// Relationship linkage, keyed by relationship name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

impl ResourceObject {
    /// Creates a resource object with no attributes or relationships.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        ResourceObject {
            kind: kind.into(),
            id: id.into(),
            attributes: Map::new(),
            relationships: BTreeMap::new(),
        }
    }

    /// The `{type, id}` identifier of this resource.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.kind.clone(), self.id.clone())
    }
}

/// The primary data of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    /// A single resource; `None` serializes as `null` for a miss.
    Single(Option<ResourceObject>),
    /// An ordered collection of resources.
    Collection(Vec<ResourceObject>),
}

/// A complete JSON:API document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The primary data.
    pub data: PrimaryData,
    /// Side-loaded related resources, deduplicated by `(type, id)`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
    /// Document-level metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl Document {
    /// Creates a single-resource document.
    pub fn single(resource: Option<ResourceObject>) -> Self {
        Document {
            data: PrimaryData::Single(resource),
            included: Vec::new(),
            meta: None,
        }
    }

    /// Creates a collection document.
    pub fn collection(resources: Vec<ResourceObject>) -> Self {
        Document {
            data: PrimaryData::Collection(resources),
            included: Vec::new(),
            meta: None,
        }
    }

    /// Attaches side-loaded resources.
    pub fn with_included(mut self, included: Vec<ResourceObject>) -> Self {
        self.included = included;
        self
    }

    /// Attaches document-level metadata.
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Pagination metadata for collection documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of records matching the query, before paging.
    pub total: u64,
    /// Offset of the first returned record.
    pub offset: u64,
    /// Maximum number of returned records.
    pub limit: u64,
}

impl PageMeta {
    /// Renders this metadata as a document `meta` map.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert("total".to_string(), Value::from(self.total));
        meta.insert("offset".to_string(), Value::from(self.offset));
        meta.insert("limit".to_string(), Value::from(self.limit));
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_identifier_serializes_type_keyword() {
        let id = ResourceIdentifier::new("rats", "8e2f1412");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, json!({"type": "rats", "id": "8e2f1412"}));
    }

    #[test]
    fn test_to_one_relationship_null_linkage() {
        let rel = Relationship::to_one(None);
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json, json!({"data": null}));
    }

    #[test]
    fn test_to_many_relationship_linkage() {
        let rel = Relationship::to_many(vec![
            ResourceIdentifier::new("rats", "1"),
            ResourceIdentifier::new("rats", "2"),
        ]);
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(
            json,
            json!({"data": [
                {"type": "rats", "id": "1"},
                {"type": "rats", "id": "2"}
            ]})
        );
    }

    #[test]
    fn test_empty_to_many_is_empty_array_not_null() {
        let rel = Relationship::to_many(Vec::new());
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json, json!({"data": []}));
    }

    #[test]
    fn test_resource_object_omits_empty_members() {
        let resource = ResourceObject::new("rescues", "abc");
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json, json!({"type": "rescues", "id": "abc"}));
    }

    #[test]
    fn test_resource_object_attribute_order_is_preserved() {
        let mut resource = ResourceObject::new("rescues", "abc");
        resource
            .attributes
            .insert("client".to_string(), json!("CMDR Jameson"));
        resource.attributes.insert("codeRed".to_string(), json!(true));
        resource.attributes.insert("status".to_string(), json!("open"));

        let text = serde_json::to_string(&resource).unwrap();
        let client = text.find("client").unwrap();
        let code_red = text.find("codeRed").unwrap();
        let status = text.find("status").unwrap();
        assert!(client < code_red && code_red < status);
    }

    #[test]
    fn test_single_document_with_null_data() {
        let doc = Document::single(None);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json, json!({"data": null}));
    }

    #[test]
    fn test_collection_document_with_meta() {
        let meta = PageMeta {
            total: 1312,
            offset: 50,
            limit: 25,
        };
        let doc = Document::collection(Vec::new()).with_meta(meta.to_map());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            json!({"data": [], "meta": {"total": 1312, "offset": 50, "limit": 25}})
        );
    }

    #[test]
    fn test_document_round_trip() {
        let mut resource = ResourceObject::new("users", "u1");
        resource.attributes.insert("status".to_string(), json!("active"));
        resource.relationships.insert(
            "rats".to_string(),
            Relationship::to_many(vec![ResourceIdentifier::new("rats", "r1")]),
        );
        let doc = Document::collection(vec![resource.clone()])
            .with_included(vec![ResourceObject::new("rats", "r1")]);

        let text = serde_json::to_string(&doc).unwrap();
        let parsed: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, doc);
    }
}
