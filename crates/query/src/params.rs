//! The raw request-parameter bag.
//!
//! The transport layer hands compilation a flat multimap of query parameters.
//! Values are kept verbatim; nothing here validates or coerces. Parameters a
//! request never declared simply are not present, and parameters outside the
//! recognized families are carried but ignored by the compiler.

use std::collections::HashMap;

/// An untrusted query-parameter multimap.
///
/// A parameter may appear more than once; values for one name keep arrival
/// order, and [`RawParams::get`] returns the first, matching common HTTP
/// framework behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    params: HashMap<String, Vec<String>>,
}

impl RawParams {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in pairs {
            params.entry(key.into()).or_default().push(value.into());
        }
        RawParams { params }
    }

    /// Parses a raw query string, percent-decoding keys and values.
    ///
    /// A leading `?` is tolerated so callers can pass `Uri::query()` output
    /// or a full query string interchangeably.
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned())),
        )
    }

    /// Returns the first value supplied for a parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value supplied for a parameter.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.params.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the parameter was supplied at all.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Iterates over every `(name, value)` pair in the bag.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().flat_map(|(key, values)| {
            values.iter().map(move |value| (key.as_str(), value.as_str()))
        })
    }

    /// Iterates the inner keys and first values of a bracketed family.
    ///
    /// `bracketed("fields")` yields `("users", "email,status")` for a bag
    /// containing `fields[users]=email,status`. Keys that are not of the
    /// `outer[inner]` form never match.
    pub fn bracketed<'a>(&'a self, outer: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.params.iter().filter_map(move |(key, values)| {
            let (parsed_outer, inner) = parse_bracket_key(key)?;
            if parsed_outer == outer {
                Some((inner, values.first()?.as_str()))
            } else {
                None
            }
        })
    }

    /// Number of distinct parameter names in the bag.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Splits a bracketed key like `page[size]` into `("page", "size")`.
///
/// Returns `None` for keys that are not of the single-level `outer[inner]`
/// form; such keys are simply not members of any bracketed family.
pub(crate) fn parse_bracket_key(key: &str) -> Option<(&str, &str)> {
    let body = key.strip_suffix(']')?;
    let (outer, inner) = body.split_once('[')?;
    if outer.is_empty() || inner.is_empty() {
        return None;
    }
    if inner.contains('[') || inner.contains(']') {
        return None;
    }
    Some((outer, inner))
}
