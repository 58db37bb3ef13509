//! Properties of the route filter over arbitrary tables.

use proptest::prelude::*;
use proptest::sample::Index;
use railroutes::core::search::{SearchIndex, filter};
use railroutes::{RouteRecord, core::parser::parse};

fn record() -> impl Strategy<Value = RouteRecord> {
    (
        "[A-Z|]{0,6}",
        "/[a-zA-Z:_/().]{0,12}",
        "[a-z_/]{1,10}",
        "[a-z_]{0,8}",
        "[a-zA-Z_]{0,8}",
    )
        .prop_map(|(verb, uri, controller, action, prefix)| {
            RouteRecord::new(verb, uri, controller, action, prefix)
        })
}

fn field(r: &RouteRecord, which: usize) -> String {
    match which {
        0 => r.verb.clone(),
        1 => r.uri_pattern.clone(),
        2 => r.handler(),
        _ => r.prefix.clone(),
    }
}

fn is_subsequence(small: &[RouteRecord], big: &[RouteRecord]) -> bool {
    let mut rest = big.iter();
    small.iter().all(|s| rest.any(|b| b == s))
}

proptest! {
    #[test]
    fn empty_query_returns_everything(records in prop::collection::vec(record(), 0..40)) {
        prop_assert_eq!(filter(&records, ""), records);
    }

    #[test]
    fn whitespace_query_never_matches_blank_free_fields(
        records in prop::collection::vec(record(), 0..40),
        spaces in " {1,3}",
    ) {
        prop_assert!(filter(&records, &spaces).is_empty());
    }

    #[test]
    fn any_field_substring_finds_its_row(
        records in prop::collection::vec(record(), 1..40),
        pick in any::<Index>(),
        which in 0usize..4,
        start in any::<Index>(),
        len in any::<Index>(),
    ) {
        let target = &records[pick.index(records.len())];
        let text = field(target, which);
        let from = start.index(text.len() + 1);
        let to = from + len.index(text.len() - from + 1);
        let query = &text[from..to];

        prop_assert!(filter(&records, query).contains(target));
    }

    #[test]
    fn results_keep_table_order(
        records in prop::collection::vec(record(), 0..40),
        query in "[a-z/#_]{0,3}",
    ) {
        let hits = filter(&records, &query);
        prop_assert!(is_subsequence(&hits, &records));
    }

    #[test]
    fn case_does_not_matter(
        records in prop::collection::vec(record(), 0..40),
        query in "[a-zA-Z/#_]{0,4}",
    ) {
        prop_assert_eq!(
            filter(&records, &query.to_uppercase()),
            filter(&records, &query.to_lowercase())
        );
    }

    #[test]
    fn index_agrees_with_direct_filter(
        records in prop::collection::vec(record(), 0..40),
        query in "[a-z/#_]{0,3}",
    ) {
        let index = SearchIndex::build(&records);
        prop_assert_eq!(index.filter(&records, &query), filter(&records, &query));
    }

    #[test]
    fn parser_never_panics(raw in "\\PC{0,200}") {
        let _ = parse(&raw);
    }
}

// Test: the typical browse flow over a parsed table.
#[test]
fn parsed_table_search_scenario() {
    let raw = include_str!("fixtures/routes.txt");
    let records = parse(raw);
    assert_eq!(records.len(), 7);

    let hits = filter(&records, "user");
    let handlers: Vec<String> = hits.iter().map(RouteRecord::handler).collect();
    assert_eq!(
        handlers,
        ["users#index", "users#create", "users#new", "users#show", "users#destroy"]
    );

    // Each field matches on its own; no match across a field boundary
    assert!(filter(&records, "GET /users").is_empty());
    assert_eq!(filter(&records, "admin_posts").len(), 1);
}
