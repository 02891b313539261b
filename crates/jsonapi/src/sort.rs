//! Sort keys and direction tokens.
//!
//! JSON:API encodes direction as an optional `-` prefix on each token of the
//! `order` parameter (`order=status,-createdAt`). The data layer consumes an
//! explicit direction token instead, so the prefix form is parsed exactly
//! once, at the request boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction of a single sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lowest value first.
    #[default]
    Ascending,
    /// Highest value first.
    Descending,
}

impl SortOrder {
    /// Returns the SQL ordering token for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }

    /// Returns the opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "ascending"),
            SortOrder::Descending => write!(f, "descending"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascending" => Ok(SortOrder::Ascending),
            "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("unknown sort order: {}", s)),
        }
    }
}

/// A single compiled sort key: a field name plus a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// The attribute to sort by.
    pub field: String,
    /// The direction for this key.
    pub order: SortOrder,
}

impl SortKey {
    /// Creates an ascending sort key.
    pub fn ascending(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    /// Creates a descending sort key.
    pub fn descending(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }

    /// Parses one token of an `order` parameter.
    ///
    /// A `-` prefix selects descending order; any other token is an
    /// ascending sort by that field.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.strip_prefix('-') {
            Some(field) => SortKey::descending(field),
            None => SortKey::ascending(token),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            SortOrder::Ascending => write!(f, "{}", self.field),
            SortOrder::Descending => write!(f, "-{}", self.field),
        }
    }
}
