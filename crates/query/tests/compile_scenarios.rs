//! End-to-end compilation scenarios.
//!
//! These tests drive the compiler the way the transport layer does: a raw
//! query string in, a complete descriptor or a wire-ready error document out.

use mayday_jsonapi::sort::{SortKey, SortOrder};
use mayday_query::{Comparison, Filter, PageConfig, RawParams, ResourceQuery};
use serde_json::json;

/// Helper to compile a query string with default pagination config
fn compile(query: &str) -> Result<ResourceQuery, mayday_query::QueryError> {
    let params = RawParams::from_query_str(query);
    ResourceQuery::compile(&params, &PageConfig::default(), None)
}

/// Page-number pagination multiplies out to an offset
#[test]
fn test_page_number_times_size_becomes_offset() {
    let query = compile("page[number]=3&page[size]=25").unwrap();
    assert_eq!(query.offset, 75);
    assert_eq!(query.limit, 25);
}

/// Page-number pagination is equivalent to spelling out the same window raw
#[test]
fn test_page_number_equivalent_to_raw_window() {
    let paged = compile("page[number]=3&page[size]=25").unwrap();
    let raw = compile("page[offset]=75&page[limit]=25").unwrap();
    assert_eq!(paged.offset, raw.offset);
    assert_eq!(paged.limit, raw.limit);
}

/// Each order token compiles to a field plus an explicit direction
#[test]
fn test_order_tokens_round_trip() {
    let query = compile("order=-createdAt,name").unwrap();
    assert_eq!(
        query.sort,
        vec![SortKey::descending("createdAt"), SortKey::ascending("name")]
    );
}

/// Page-number pagination wins over raw offset/limit in the same request
#[test]
fn test_page_number_overrides_raw_offset_and_limit() {
    let query = compile("page[number]=1&page[size]=30&page[offset]=500&page[limit]=7").unwrap();
    assert_eq!(query.offset, 30);
    assert_eq!(query.limit, 30);
}

/// An oversized limit is capped to the configured maximum, not rejected
#[test]
fn test_oversized_limit_is_capped() {
    let query = compile("page[limit]=10000").unwrap();
    assert_eq!(query.limit, 100);

    let config = PageConfig {
        max_limit: 250,
        ..Default::default()
    };
    let params = RawParams::from_query_str("page[limit]=10000");
    let query = ResourceQuery::compile(&params, &config, None).unwrap();
    assert_eq!(query.limit, 250);
}

/// Every compiled window satisfies offset >= 0 and 1 <= limit <= max
#[test]
fn test_windows_always_satisfy_bounds() {
    let cases = [
        "",
        "page[number]=0",
        "page[number]=9999",
        "page[size]=1",
        "page[offset]=12",
        "page[limit]=1",
        "page[number]=7&page[size]=100",
    ];
    for case in cases {
        let query = compile(case).unwrap();
        assert!(query.limit >= 1, "limit too small for {:?}", case);
        assert!(query.limit <= 100, "limit too large for {:?}", case);
    }
}

/// A percent-encoded JSON filter compiles into a predicate tree
#[test]
fn test_filter_round_trip_through_query_string() {
    let query = compile(
        "filter=%7B%22status%22%3A%22open%22%2C%22platform%22%3A%5B%22pc%22%2C%22xb%22%5D%7D",
    )
    .unwrap();
    let terms = query.filter.terms();
    assert_eq!(terms.len(), 2);
    assert!(terms
        .iter()
        .any(|t| t.path == "status" && t.op == Comparison::Eq && t.value == json!("open")));
    assert!(terms
        .iter()
        .any(|t| t.path == "platform" && t.op == Comparison::In));
}

/// A malformed filter produces a 422 error document naming the parameter
#[test]
fn test_malformed_filter_becomes_unprocessable_entity() {
    let error = compile("filter=%7Bnot-json").unwrap_err();
    let document = serde_json::to_value(error.to_document()).unwrap();
    assert_eq!(document["errors"][0]["status"], "422");
    assert_eq!(document["errors"][0]["source"]["parameter"], "filter");
}

/// A non-numeric page value produces a 422 naming that exact parameter
#[test]
fn test_bad_page_value_names_the_parameter() {
    let error = compile("page[size]=lots").unwrap_err();
    let document = serde_json::to_value(error.to_document()).unwrap();
    assert_eq!(document["errors"][0]["status"], "422");
    assert_eq!(document["errors"][0]["source"]["parameter"], "page[size]");
}

/// Unknown parameters and unknown page keys never fail compilation
#[test]
fn test_unknown_parameters_are_ignored() {
    let query = compile("page[cursor]=abc&debug=1&order=name").unwrap();
    assert_eq!(query.sort, vec![SortKey::ascending("name")]);
}

/// Compilation is deterministic for a fixed bag and config
#[test]
fn test_compilation_is_idempotent() {
    let raw = "page[number]=2&page[size]=10&order=-createdAt,status&include=rats.user&filter=%7B%22codeRed%22%3Atrue%7D";
    let first = compile(raw).unwrap();
    let second = compile(raw).unwrap();
    assert_eq!(first, second);
}

/// The full parameter surface compiles together
#[test]
fn test_full_request_compiles() {
    let query = compile(
        "page[number]=1&page[size]=20\
         &order=-createdAt\
         &fields[rescues]=client,status\
         &include=rats,firstLimpet\
         &filter=%7B%22status%22%3A%7B%22ne%22%3A%22closed%22%7D%7D",
    )
    .unwrap();

    assert_eq!(query.offset, 20);
    assert_eq!(query.limit, 20);
    assert_eq!(query.sort[0].order, SortOrder::Descending);
    assert!(query.field_requested("rescues", "client"));
    assert!(!query.field_requested("rescues", "notes"));
    assert_eq!(query.include, vec!["rats", "firstLimpet"]);
    match &query.filter {
        Filter::Term(term) => {
            assert_eq!(term.path, "status");
            assert_eq!(term.op, Comparison::Ne);
        }
        other => panic!("expected a single term, got {:?}", other),
    }
}
