//! The dispatch API's shipped resource schemas.
//!
//! Five types make up the public surface: `users`, `rats`, `rescues`,
//! `ships`, and `decals`. Their tiers encode the upstream visibility rules:
//! contact details and personal data are `self`, operational fields are
//! `group`, and moderation fields like `suspended` are `internal`. Rescues
//! have no owner, so their `self` tier never grants.

use chrono::{SecondsFormat, TimeZone, Utc};
use mayday_jsonapi::sort::SortKey;
use mayday_jsonapi::tier::PermissionTier;
use serde_json::Value;

use crate::schema::{ResourceSchema, SchemaRegistry};

/// Renders epoch-millisecond timestamps as RFC 3339 UTC strings.
///
/// Rows arrive from the SQL driver with integer timestamp columns; anything
/// that is not an integer (including an already-formatted string) passes
/// through untouched, so re-serializing a rendered document is harmless.
pub fn timestamp(value: &Value) -> Value {
    match value.as_i64() {
        Some(millis) => match Utc.timestamp_millis_opt(millis) {
            chrono::LocalResult::Single(at) => {
                Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            _ => value.clone(),
        },
        None => value.clone(),
    }
}

/// The `users` schema.
pub fn users() -> ResourceSchema {
    ResourceSchema::new("users")
        .with_owner_field("id")
        .with_attribute_at("email", PermissionTier::Self_)
        .with_attribute_at("data", PermissionTier::Self_)
        .with_attribute("status")
        .with_attribute_at("suspended", PermissionTier::Internal)
        .with_transformed_attribute("createdAt", None, timestamp)
        .with_transformed_attribute("updatedAt", None, timestamp)
        .with_to_many("rats", "rats", None)
        .with_to_one("displayRat", "rats", None)
}

/// The `rats` schema.
pub fn rats() -> ResourceSchema {
    ResourceSchema::new("rats")
        .with_owner_field("userId")
        .with_attribute("name")
        .with_attribute("platform")
        .with_attribute_at("data", PermissionTier::Self_)
        .with_transformed_attribute("joined", None, timestamp)
        .with_transformed_attribute("createdAt", None, timestamp)
        .with_transformed_attribute("updatedAt", None, timestamp)
        .with_to_one("user", "users", None)
        .with_to_many("ships", "ships", None)
}

/// The `rescues` schema.
///
/// Rescues belong to the case, not to a user, so nothing on them is
/// self-scoped.
pub fn rescues() -> ResourceSchema {
    ResourceSchema::new("rescues")
        .with_attribute("client")
        .with_attribute("codeRed")
        .with_attribute("data")
        .with_attribute("notes")
        .with_attribute("platform")
        .with_attribute("quotes")
        .with_attribute("status")
        .with_attribute("system")
        .with_attribute("title")
        .with_attribute("outcome")
        .with_attribute("unidentifiedRats")
        .with_transformed_attribute("createdAt", None, timestamp)
        .with_transformed_attribute("updatedAt", None, timestamp)
        .with_default_sort(vec![SortKey::descending("createdAt")])
        .with_to_many("rats", "rats", None)
        .with_to_one("firstLimpet", "rats", None)
}

/// The `ships` schema.
pub fn ships() -> ResourceSchema {
    ResourceSchema::new("ships")
        .with_attribute("name")
        .with_attribute("shipType")
        .with_attribute("shipId")
        .with_transformed_attribute("createdAt", None, timestamp)
        .with_transformed_attribute("updatedAt", None, timestamp)
        .with_to_one("rat", "rats", None)
}

/// The `decals` schema.
pub fn decals() -> ResourceSchema {
    ResourceSchema::new("decals")
        .with_owner_field("userId")
        .with_attribute_at("code", PermissionTier::Self_)
        .with_attribute("type")
        .with_transformed_attribute("claimedAt", None, timestamp)
        .with_attribute_at("notes", PermissionTier::Self_)
        .with_transformed_attribute("createdAt", None, timestamp)
        .with_transformed_attribute("updatedAt", None, timestamp)
        .with_to_one("user", "users", None)
}

/// Builds a registry containing every shipped schema.
pub fn default_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register(users());
    registry.register(rats());
    registry.register(rescues());
    registry.register(ships());
    registry.register(decals());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_registry_contains_all_types() {
        let registry = default_registry();
        assert_eq!(registry.len(), 5);
        for kind in ["users", "rats", "rescues", "ships", "decals"] {
            assert!(registry.get(kind).is_some(), "missing schema for {}", kind);
        }
    }

    #[test]
    fn test_users_tiers() {
        let schema = users();
        let email = schema.attribute("email").unwrap();
        let status = schema.attribute("status").unwrap();
        let suspended = schema.attribute("suspended").unwrap();
        assert_eq!(schema.attribute_tier(email), PermissionTier::Self_);
        assert_eq!(schema.attribute_tier(status), PermissionTier::Group);
        assert_eq!(schema.attribute_tier(suspended), PermissionTier::Internal);
    }

    #[test]
    fn test_rescues_have_no_owner_and_a_default_sort() {
        let schema = rescues();
        assert!(schema.owner_field.is_none());
        assert_eq!(
            schema.default_sort,
            Some(vec![SortKey::descending("createdAt")])
        );
    }

    #[test]
    fn test_timestamp_renders_epoch_millis() {
        let rendered = timestamp(&json!(1700000000000_i64));
        assert_eq!(rendered, json!("2023-11-14T22:13:20.000Z"));
    }

    #[test]
    fn test_timestamp_passes_strings_through() {
        let rendered = timestamp(&json!("2023-11-14T22:13:20.000Z"));
        assert_eq!(rendered, json!("2023-11-14T22:13:20.000Z"));
    }

    #[test]
    fn test_timestamp_passes_null_through() {
        assert_eq!(timestamp(&json!(null)), json!(null));
    }
}
