//! Principals and per-record access evaluation.

use std::collections::HashSet;

use mayday_jsonapi::tier::PermissionTier;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::schema::ResourceSchema;

/// The actor a request is served as.
///
/// A principal with no `user_id` is anonymous; it can still hold permissions
/// (API tokens do), though in practice anonymous requests arrive with none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The acting user, absent for anonymous requests.
    pub user_id: Option<Uuid>,
    /// Granted permission strings, e.g. `"rescues.read"`.
    pub permissions: HashSet<String>,
}

impl Principal {
    /// An unauthenticated principal with no grants.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A principal acting as `user_id`, with no grants yet.
    pub fn for_user(user_id: Uuid) -> Self {
        Principal {
            user_id: Some(user_id),
            permissions: HashSet::new(),
        }
    }

    /// Adds a permission grant.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Whether the principal holds `permission`.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// The tiers a principal qualifies for against one specific record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Access {
    /// The record's owner is the principal.
    pub is_self: bool,
    /// The principal holds the type's read permission.
    pub is_group: bool,
    /// The principal holds the type's internal permission.
    pub is_internal: bool,
}

impl Access {
    /// No qualification at all; what an anonymous request gets.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether a field declared at `tier` is visible under this access.
    ///
    /// Exactly one flag is consulted per tier. Qualifications never cascade:
    /// `is_internal` does not imply `is_group`, and neither implies
    /// `is_self`.
    pub fn grants(&self, tier: PermissionTier) -> bool {
        match tier {
            PermissionTier::Self_ => self.is_self,
            PermissionTier::Group => self.is_group,
            PermissionTier::Internal => self.is_internal,
        }
    }

    /// Whether no tier is granted at all.
    pub fn is_none(&self) -> bool {
        !self.is_self && !self.is_group && !self.is_internal
    }
}

/// Evaluates which tiers `principal` qualifies for on `record`.
///
/// `is_group` and `is_internal` depend only on the principal's grants, but
/// `is_self` compares the record's owner field against the principal's user
/// id and therefore must be recomputed for every record in a collection. An
/// absent principal qualifies for nothing.
pub fn qualifying_access(
    principal: Option<&Principal>,
    record: &Value,
    schema: &ResourceSchema,
) -> Access {
    let Some(principal) = principal else {
        return Access::none();
    };

    let is_self = match (&schema.owner_field, principal.user_id) {
        (Some(owner_field), Some(user_id)) => record
            .get(owner_field)
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .is_some_and(|owner| owner == user_id),
        _ => false,
    };

    Access {
        is_self,
        is_group: principal.has_permission(&schema.read_permission),
        is_internal: principal.has_permission(&schema.internal_permission),
    }
}
