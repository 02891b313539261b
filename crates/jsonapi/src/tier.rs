//! Read-permission tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The qualification required to read a field or relationship.
///
/// Tiers are checked independently, never cumulatively: a field declared at
/// `group` is invisible to the record's owner unless the owner also holds the
/// group permission, and an internal reader sees nothing declared at `self`
/// on records they do not own. Exactly one tier is consulted per declared
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionTier {
    /// Visible when the record's owner is the requesting user.
    #[serde(rename = "self")]
    Self_,
    /// Visible to holders of the resource type's read permission.
    #[serde(rename = "group")]
    Group,
    /// Visible to holders of the resource type's internal permission.
    #[serde(rename = "internal")]
    Internal,
}

impl PermissionTier {
    /// Returns the wire name of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionTier::Self_ => "self",
            PermissionTier::Group => "group",
            PermissionTier::Internal => "internal",
        }
    }
}

impl fmt::Display for PermissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "self" => Ok(PermissionTier::Self_),
            "group" => Ok(PermissionTier::Group),
            "internal" => Ok(PermissionTier::Internal),
            _ => Err(format!("unknown permission tier: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_as_str() {
        assert_eq!(PermissionTier::Self_.as_str(), "self");
        assert_eq!(PermissionTier::Group.as_str(), "group");
        assert_eq!(PermissionTier::Internal.as_str(), "internal");
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!(
            "self".parse::<PermissionTier>().unwrap(),
            PermissionTier::Self_
        );
        assert_eq!(
            "Internal".parse::<PermissionTier>().unwrap(),
            PermissionTier::Internal
        );
        assert!("admin".parse::<PermissionTier>().is_err());
    }

    #[test]
    fn test_tier_serde_uses_wire_names() {
        let json = serde_json::to_value(PermissionTier::Self_).unwrap();
        assert_eq!(json, "self");
        let tier: PermissionTier = serde_json::from_value(json).unwrap();
        assert_eq!(tier, PermissionTier::Self_);
    }
}
