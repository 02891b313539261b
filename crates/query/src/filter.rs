//! The `filter` predicate grammar.
//!
//! The `filter` parameter carries a JSON object describing which records to
//! match. It is parsed here into a tree of typed terms and handed to the data
//! layer as data; no fragment of it is ever spliced into a SQL string, so a
//! hostile filter can at worst match nothing.
//!
//! # Grammar
//!
//! - An object is the conjunction of its entries.
//! - `"and"` and `"or"` take an array of objects; `"not"` takes one object.
//!   These three keys are reserved and never treated as field names.
//! - Any other key is a dotted field path whose value is either a scalar
//!   (equality), an array (membership), or an object of operator/operand
//!   pairs.
//!
//! ```json
//! {
//!   "status": "open",
//!   "or": [
//!     {"platform": "pc"},
//!     {"codeRed": true}
//!   ],
//!   "data.languageCode": {"like": "en%"}
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{QueryError, QueryResult};

/// Comparison operators usable in filter terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Case-sensitive pattern match.
    Like,
    /// Case-insensitive pattern match.
    ILike,
    /// Membership in an array of values.
    In,
}

impl Comparison {
    /// Returns the SQL comparison token for this operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "!=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
            Comparison::Like => "LIKE",
            Comparison::ILike => "ILIKE",
            Comparison::In => "IN",
        }
    }

    /// Returns the wire name of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Eq => "eq",
            Comparison::Ne => "ne",
            Comparison::Gt => "gt",
            Comparison::Gte => "gte",
            Comparison::Lt => "lt",
            Comparison::Lte => "lte",
            Comparison::Like => "like",
            Comparison::ILike => "ilike",
            Comparison::In => "in",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "eq" => Ok(Comparison::Eq),
            "ne" => Ok(Comparison::Ne),
            "gt" => Ok(Comparison::Gt),
            "gte" => Ok(Comparison::Gte),
            "lt" => Ok(Comparison::Lt),
            "lte" => Ok(Comparison::Lte),
            "like" => Ok(Comparison::Like),
            "ilike" => Ok(Comparison::ILike),
            "in" => Ok(Comparison::In),
            _ => Err(format!("unknown comparison operator: {}", s)),
        }
    }
}

/// A single field comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTerm {
    /// Dotted path to the field, e.g. `data.languageCode`.
    pub path: String,
    /// The comparison operator.
    pub op: Comparison,
    /// The operand, carried verbatim for the data layer to bind.
    pub value: Value,
}

impl FilterTerm {
    /// Creates a term.
    pub fn new(path: impl Into<String>, op: Comparison, value: Value) -> Self {
        FilterTerm {
            path: path.into(),
            op,
            value,
        }
    }
}

/// A parsed filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every branch must match. An empty conjunction matches everything.
    And(Vec<Filter>),
    /// At least one branch must match.
    Or(Vec<Filter>),
    /// The inner predicate must not match.
    Not(Box<Filter>),
    /// A single comparison.
    Term(FilterTerm),
}

impl Filter {
    /// The predicate that matches every record.
    pub fn empty() -> Self {
        Filter::And(Vec::new())
    }

    /// Whether this predicate restricts anything.
    pub fn is_empty(&self) -> bool {
        matches!(self, Filter::And(branches) if branches.is_empty())
    }

    /// Parses the raw `filter` query parameter.
    pub fn parse_param(raw: &str) -> QueryResult<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|err| QueryError::MalformedFilter {
            detail: format!("not valid JSON: {}", err),
        })?;
        Self::from_value(&value)
    }

    /// Builds a predicate from an already-parsed payload.
    ///
    /// The top level must be an object; its entries are conjoined.
    pub fn from_value(value: &Value) -> QueryResult<Self> {
        let object = value.as_object().ok_or_else(|| QueryError::MalformedFilter {
            detail: "top level must be an object".to_string(),
        })?;

        let mut branches = Vec::with_capacity(object.len());
        for (key, entry) in object {
            branches.push(Self::from_entry(key, entry)?);
        }
        Ok(conjoin(branches))
    }

    fn from_entry(key: &str, value: &Value) -> QueryResult<Self> {
        match key {
            "and" | "or" => {
                let entries = value.as_array().ok_or_else(|| QueryError::MalformedFilter {
                    detail: format!("{:?} takes an array of objects", key),
                })?;
                let branches = entries
                    .iter()
                    .map(Self::from_value)
                    .collect::<QueryResult<Vec<_>>>()?;
                if key == "and" {
                    Ok(Filter::And(branches))
                } else {
                    Ok(Filter::Or(branches))
                }
            }
            "not" => {
                if !value.is_object() {
                    return Err(QueryError::MalformedFilter {
                        detail: "\"not\" takes an object".to_string(),
                    });
                }
                Ok(Filter::Not(Box::new(Self::from_value(value)?)))
            }
            path => Self::from_field(path, value),
        }
    }

    fn from_field(path: &str, value: &Value) -> QueryResult<Self> {
        match value {
            Value::Object(operators) => {
                let mut terms = Vec::with_capacity(operators.len());
                for (name, operand) in operators {
                    let op = name.parse::<Comparison>().map_err(|_| {
                        QueryError::MalformedFilter {
                            detail: format!("unknown operator {:?} for field {:?}", name, path),
                        }
                    })?;
                    if op == Comparison::In && !operand.is_array() {
                        return Err(QueryError::MalformedFilter {
                            detail: format!("\"in\" for field {:?} takes an array", path),
                        });
                    }
                    terms.push(Filter::Term(FilterTerm::new(path, op, operand.clone())));
                }
                Ok(conjoin(terms))
            }
            Value::Array(_) => Ok(Filter::Term(FilterTerm::new(
                path,
                Comparison::In,
                value.clone(),
            ))),
            _ => Ok(Filter::Term(FilterTerm::new(
                path,
                Comparison::Eq,
                value.clone(),
            ))),
        }
    }

    /// Iterates every term in the tree, depth first.
    pub fn terms(&self) -> Vec<&FilterTerm> {
        let mut terms = Vec::new();
        self.collect_terms(&mut terms);
        terms
    }

    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a FilterTerm>) {
        match self {
            Filter::And(branches) | Filter::Or(branches) => {
                for branch in branches {
                    branch.collect_terms(terms);
                }
            }
            Filter::Not(inner) => inner.collect_terms(terms),
            Filter::Term(term) => terms.push(term),
        }
    }
}

/// A single branch stands alone; multiple branches are conjoined.
fn conjoin(mut branches: Vec<Filter>) -> Filter {
    if branches.len() == 1 {
        branches.remove(0)
    } else {
        Filter::And(branches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Filter {
        Filter::from_value(&value).unwrap()
    }

    #[test]
    fn test_comparison_from_str() {
        assert_eq!("eq".parse::<Comparison>().unwrap(), Comparison::Eq);
        assert_eq!("iLike".parse::<Comparison>().unwrap(), Comparison::ILike);
        assert!("between".parse::<Comparison>().is_err());
    }

    #[test]
    fn test_comparison_as_sql() {
        assert_eq!(Comparison::Gte.as_sql(), ">=");
        assert_eq!(Comparison::ILike.as_sql(), "ILIKE");
        assert_eq!(Comparison::In.as_sql(), "IN");
    }

    #[test]
    fn test_scalar_value_is_equality() {
        let filter = parse(json!({"status": "open"}));
        assert_eq!(
            filter,
            Filter::Term(FilterTerm::new("status", Comparison::Eq, json!("open")))
        );
    }

    #[test]
    fn test_null_value_is_equality_with_null() {
        let filter = parse(json!({"outcome": null}));
        assert_eq!(
            filter,
            Filter::Term(FilterTerm::new("outcome", Comparison::Eq, json!(null)))
        );
    }

    #[test]
    fn test_array_value_is_membership() {
        let filter = parse(json!({"platform": ["pc", "xb"]}));
        assert_eq!(
            filter,
            Filter::Term(FilterTerm::new(
                "platform",
                Comparison::In,
                json!(["pc", "xb"])
            ))
        );
    }

    #[test]
    fn test_operator_object() {
        let filter = parse(json!({"createdAt": {"gte": 1700000000000_i64}}));
        assert_eq!(
            filter,
            Filter::Term(FilterTerm::new(
                "createdAt",
                Comparison::Gte,
                json!(1700000000000_i64)
            ))
        );
    }

    #[test]
    fn test_multiple_operators_conjoin() {
        let filter = parse(json!({"createdAt": {"gte": 100, "lt": 200}}));
        let Filter::And(branches) = filter else {
            panic!("expected a conjunction");
        };
        assert_eq!(branches.len(), 2);
    }

    #[test]
    fn test_multiple_fields_conjoin() {
        let filter = parse(json!({"status": "open", "platform": "pc"}));
        let Filter::And(branches) = filter else {
            panic!("expected a conjunction");
        };
        assert_eq!(branches.len(), 2);
    }

    #[test]
    fn test_or_combinator() {
        let filter = parse(json!({"or": [{"status": "open"}, {"codeRed": true}]}));
        let Filter::Or(branches) = filter else {
            panic!("expected a disjunction");
        };
        assert_eq!(branches.len(), 2);
    }

    #[test]
    fn test_not_combinator() {
        let filter = parse(json!({"not": {"status": "closed"}}));
        let Filter::Not(inner) = filter else {
            panic!("expected a negation");
        };
        assert_eq!(
            *inner,
            Filter::Term(FilterTerm::new("status", Comparison::Eq, json!("closed")))
        );
    }

    #[test]
    fn test_nested_combinators() {
        let filter = parse(json!({
            "status": "open",
            "or": [
                {"platform": "pc"},
                {"and": [{"codeRed": true}, {"system": {"ilike": "%sol%"}}]}
            ]
        }));
        assert_eq!(filter.terms().len(), 4);
    }

    #[test]
    fn test_dotted_path_is_preserved() {
        let filter = parse(json!({"data.languageCode": "en"}));
        let terms = filter.terms();
        assert_eq!(terms[0].path, "data.languageCode");
    }

    #[test]
    fn test_empty_object_matches_everything() {
        let filter = parse(json!({}));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_parse_param_rejects_invalid_json() {
        let error = Filter::parse_param("{status: open}").unwrap_err();
        assert!(matches!(error, QueryError::MalformedFilter { .. }));
        assert_eq!(error.parameter(), "filter");
    }

    #[test]
    fn test_rejects_non_object_top_level() {
        let error = Filter::parse_param("[1, 2, 3]").unwrap_err();
        assert!(matches!(error, QueryError::MalformedFilter { .. }));
    }

    #[test]
    fn test_rejects_unknown_operator() {
        let error = Filter::from_value(&json!({"status": {"regexp": "^o"}})).unwrap_err();
        let QueryError::MalformedFilter { detail } = error else {
            panic!("expected a malformed filter");
        };
        assert!(detail.contains("regexp"));
    }

    #[test]
    fn test_rejects_scalar_operand_for_in() {
        let error = Filter::from_value(&json!({"platform": {"in": "pc"}})).unwrap_err();
        assert!(matches!(error, QueryError::MalformedFilter { .. }));
    }

    #[test]
    fn test_rejects_scalar_branches_in_or() {
        let error = Filter::from_value(&json!({"or": ["status", "platform"]})).unwrap_err();
        assert!(matches!(error, QueryError::MalformedFilter { .. }));
    }

    #[test]
    fn test_rejects_non_array_or() {
        let error = Filter::from_value(&json!({"or": {"status": "open"}})).unwrap_err();
        let QueryError::MalformedFilter { detail } = error else {
            panic!("expected a malformed filter");
        };
        assert!(detail.contains("array"));
    }
}
