//! Declarative resource schemas.
//!
//! Each resource type declares its wire name, ordered attribute list,
//! relationship map, permission strings, and visibility defaults once, at
//! startup. Serialization walks the declaration, never the record, so a row
//! can carry database columns that simply never appear on the wire.

use std::collections::HashMap;

use mayday_jsonapi::sort::SortKey;
use mayday_jsonapi::tier::PermissionTier;
use serde_json::Value;

/// Rewrites an attribute value on its way into a document.
///
/// Transforms run only on values the principal is allowed to see; a hidden
/// field is nulled before any transform could touch it.
pub type AttributeTransform = fn(&Value) -> Value;

/// A declared attribute.
#[derive(Debug, Clone)]
pub struct AttributeDef {
    /// Wire name, which is also the record field read from the row.
    pub name: String,
    /// Read tier; `None` falls back to the schema's default tier.
    pub tier: Option<PermissionTier>,
    /// Optional value rewrite applied to visible values.
    pub transform: Option<AttributeTransform>,
}

/// Arity of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Links at most one related resource.
    ToOne,
    /// Links an ordered list of related resources.
    ToMany,
}

/// A declared relationship.
#[derive(Debug, Clone)]
pub struct RelationshipDef {
    /// Wire name, which is also the record field the nested rows are read
    /// from.
    pub name: String,
    /// The related resource type's wire name.
    pub related_type: String,
    /// Read tier; `None` falls back to the schema's default tier.
    pub tier: Option<PermissionTier>,
    /// Arity of the relationship.
    pub kind: RelationKind,
}

/// The declarative table for one resource type.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    /// JSON:API type name, e.g. `"rescues"`.
    pub resource_type: String,
    /// Attributes in wire order.
    pub attributes: Vec<AttributeDef>,
    /// Relationships in declaration order.
    pub relationships: Vec<RelationshipDef>,
    /// Tier applied to attributes and relationships that declare none.
    pub default_read_tier: PermissionTier,
    /// Record field holding the owning user's id, if the type has an owner.
    pub owner_field: Option<String>,
    /// Permission string granting group-tier reads.
    pub read_permission: String,
    /// Permission string granting internal-tier reads.
    pub internal_permission: String,
    /// Sort applied when a request names no `order`.
    pub default_sort: Option<Vec<SortKey>>,
}

impl ResourceSchema {
    /// Creates a schema for `resource_type` with group-tier defaults and the
    /// conventional `<type>.read` / `<type>.internal` permission strings.
    pub fn new(resource_type: impl Into<String>) -> Self {
        let resource_type = resource_type.into();
        let read_permission = format!("{}.read", resource_type);
        let internal_permission = format!("{}.internal", resource_type);
        ResourceSchema {
            resource_type,
            attributes: Vec::new(),
            relationships: Vec::new(),
            default_read_tier: PermissionTier::Group,
            owner_field: None,
            read_permission,
            internal_permission,
            default_sort: None,
        }
    }

    /// Declares an attribute at the schema's default tier.
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(AttributeDef {
            name: name.into(),
            tier: None,
            transform: None,
        });
        self
    }

    /// Declares an attribute at an explicit tier.
    pub fn with_attribute_at(mut self, name: impl Into<String>, tier: PermissionTier) -> Self {
        self.attributes.push(AttributeDef {
            name: name.into(),
            tier: Some(tier),
            transform: None,
        });
        self
    }

    /// Declares an attribute whose visible values pass through `transform`.
    pub fn with_transformed_attribute(
        mut self,
        name: impl Into<String>,
        tier: Option<PermissionTier>,
        transform: AttributeTransform,
    ) -> Self {
        self.attributes.push(AttributeDef {
            name: name.into(),
            tier,
            transform: Some(transform),
        });
        self
    }

    /// Declares a to-one relationship.
    pub fn with_to_one(
        mut self,
        name: impl Into<String>,
        related_type: impl Into<String>,
        tier: Option<PermissionTier>,
    ) -> Self {
        self.relationships.push(RelationshipDef {
            name: name.into(),
            related_type: related_type.into(),
            tier,
            kind: RelationKind::ToOne,
        });
        self
    }

    /// Declares a to-many relationship.
    pub fn with_to_many(
        mut self,
        name: impl Into<String>,
        related_type: impl Into<String>,
        tier: Option<PermissionTier>,
    ) -> Self {
        self.relationships.push(RelationshipDef {
            name: name.into(),
            related_type: related_type.into(),
            tier,
            kind: RelationKind::ToMany,
        });
        self
    }

    /// Sets the tier applied to declarations without one.
    pub fn with_default_tier(mut self, tier: PermissionTier) -> Self {
        self.default_read_tier = tier;
        self
    }

    /// Names the record field holding the owning user's id.
    pub fn with_owner_field(mut self, field: impl Into<String>) -> Self {
        self.owner_field = Some(field.into());
        self
    }

    /// Overrides the conventional permission strings.
    pub fn with_permissions(
        mut self,
        read: impl Into<String>,
        internal: impl Into<String>,
    ) -> Self {
        self.read_permission = read.into();
        self.internal_permission = internal.into();
        self
    }

    /// Sets the sort applied when a request names no `order`.
    pub fn with_default_sort(mut self, sort: Vec<SortKey>) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// The effective tier of an attribute.
    pub fn attribute_tier(&self, def: &AttributeDef) -> PermissionTier {
        def.tier.unwrap_or(self.default_read_tier)
    }

    /// The effective tier of a relationship.
    pub fn relationship_tier(&self, def: &RelationshipDef) -> PermissionTier {
        def.tier.unwrap_or(self.default_read_tier)
    }

    /// Looks up a relationship by wire name.
    pub fn relationship(&self, name: &str) -> Option<&RelationshipDef> {
        self.relationships.iter().find(|def| def.name == name)
    }

    /// Looks up an attribute by wire name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|def| def.name == name)
    }
}

/// Process-wide table of resource schemas.
///
/// Populated once before serving and shared read-only afterwards; lookups of
/// unregistered types return `None` rather than erroring, so an unknown type
/// in a request degrades to "nothing to serialize" instead of leaking which
/// types exist.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, ResourceSchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema, replacing any earlier declaration of the same type.
    pub fn register(&mut self, schema: ResourceSchema) {
        self.schemas.insert(schema.resource_type.clone(), schema);
    }

    /// Looks up a schema by type name.
    pub fn get(&self, resource_type: &str) -> Option<&ResourceSchema> {
        self.schemas.get(resource_type)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_schema_derives_permission_strings() {
        let schema = ResourceSchema::new("rescues");
        assert_eq!(schema.read_permission, "rescues.read");
        assert_eq!(schema.internal_permission, "rescues.internal");
        assert_eq!(schema.default_read_tier, PermissionTier::Group);
    }

    #[test]
    fn test_with_permissions_overrides_convention() {
        let schema = ResourceSchema::new("profiles").with_permissions("users.read", "users.internal");
        assert_eq!(schema.read_permission, "users.read");
        assert_eq!(schema.internal_permission, "users.internal");
    }

    #[test]
    fn test_attribute_tier_falls_back_to_default() {
        let schema = ResourceSchema::new("rescues")
            .with_default_tier(PermissionTier::Internal)
            .with_attribute("notes")
            .with_attribute_at("client", PermissionTier::Group);

        let notes = schema.attribute("notes").unwrap();
        let client = schema.attribute("client").unwrap();
        assert_eq!(schema.attribute_tier(notes), PermissionTier::Internal);
        assert_eq!(schema.attribute_tier(client), PermissionTier::Group);
    }

    #[test]
    fn test_attribute_order_is_declaration_order() {
        let schema = ResourceSchema::new("rescues")
            .with_attribute("client")
            .with_attribute("codeRed")
            .with_attribute("status");
        let names: Vec<_> = schema.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["client", "codeRed", "status"]);
    }

    #[test]
    fn test_relationship_lookup() {
        let schema = ResourceSchema::new("rescues")
            .with_to_many("rats", "rats", None)
            .with_to_one("firstLimpet", "rats", None);

        let first_limpet = schema.relationship("firstLimpet").unwrap();
        assert_eq!(first_limpet.related_type, "rats");
        assert_eq!(first_limpet.kind, RelationKind::ToOne);
        assert!(schema.relationship("outfit").is_none());
    }

    #[test]
    fn test_registry_replaces_same_type() {
        let mut registry = SchemaRegistry::new();
        registry.register(ResourceSchema::new("rescues"));
        registry.register(ResourceSchema::new("rescues").with_attribute("client"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("rescues").unwrap().attributes.len(), 1);
    }

    #[test]
    fn test_registry_unknown_type_is_none() {
        let registry = SchemaRegistry::new();
        assert!(registry.get("starships").is_none());
    }
}
