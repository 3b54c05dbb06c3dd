mod common;

use chrono::{Duration, TimeZone, Utc};
use dashboard_core::{find_by_id, query, FilterSpec, Item, ItemStatus, StatusFilter};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use common::{ids, item, seed_items};

fn spec(search: &str, status: StatusFilter, page: u32, limit: u32) -> FilterSpec {
    FilterSpec {
        search: search.to_string(),
        status,
        page,
        limit,
    }
}

#[test]
fn status_filter_selects_active_items_newest_first() {
    let result = query(&seed_items(), &spec("", StatusFilter::Only(ItemStatus::Active), 1, 10));
    assert_eq!(result.total, 3);
    assert_eq!(ids(&result.items), vec!["1", "4", "6"]);
}

#[test]
fn search_matches_title_case_insensitively() {
    let result = query(&seed_items(), &spec("dashboard", StatusFilter::All, 1, 10));
    assert_eq!(result.total, 1);
    assert_eq!(ids(&result.items), vec!["1"]);

    let result = query(&seed_items(), &spec("DASHBOARD", StatusFilter::All, 1, 10));
    assert_eq!(ids(&result.items), vec!["1"]);
}

#[test]
fn search_matches_description() {
    let result = query(&seed_items(), &spec("mobile devices", StatusFilter::All, 1, 10));
    assert_eq!(ids(&result.items), vec!["7"]);
}

#[test]
fn search_and_status_combine() {
    let result = query(
        &seed_items(),
        &spec("comprehensive", StatusFilter::Only(ItemStatus::Pending), 1, 10),
    );
    assert_eq!(ids(&result.items), vec!["5", "8"]);
    assert_eq!(result.total, 2);
}

#[test]
fn second_page_holds_the_remainder() {
    let result = query(&seed_items(), &spec("", StatusFilter::All, 2, 5));
    assert_eq!(result.items.len(), 3);
    assert_eq!(result.total, 8);
    assert_eq!(result.total_pages, 2);
    assert_eq!(result.page, 2);
    assert_eq!(result.limit, 5);
    assert_eq!(ids(&result.items), vec!["6", "7", "8"]);
}

#[test]
fn page_past_the_end_is_empty_but_keeps_counts() {
    let result = query(&seed_items(), &spec("", StatusFilter::All, 9, 5));
    assert!(result.items.is_empty());
    assert_eq!(result.total, 8);
    assert_eq!(result.total_pages, 2);
}

#[test]
fn no_matches_reports_zero_pages() {
    let result = query(&seed_items(), &spec("zzz-not-there", StatusFilter::All, 1, 10));
    assert!(result.items.is_empty());
    assert_eq!(result.total, 0);
    assert_eq!(result.total_pages, 0);
}

#[test]
fn sort_reorders_out_of_order_insertions() {
    let mut items = seed_items();
    items.reverse();
    let result = query(&items, &spec("", StatusFilter::All, 1, 3));
    assert_eq!(ids(&result.items), vec!["1", "2", "3"]);
}

#[test]
fn equal_timestamps_keep_collection_order() {
    let when = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let items = vec![
        item("b", "Second", "Same instant as the other", ItemStatus::Active, when),
        item("a", "First", "Same instant as the other", ItemStatus::Active, when),
    ];
    let result = query(&items, &FilterSpec::default());
    assert_eq!(ids(&result.items), vec!["b", "a"]);
}

#[test]
fn lookup_finds_existing_and_reports_missing() {
    let items = seed_items();
    assert_eq!(find_by_id(&items, "4").unwrap().title, "Database Migration");

    let err = find_by_id(&items, "999").unwrap_err();
    assert_eq!(err.id, "999");
}

fn arb_status() -> impl Strategy<Value = ItemStatus> {
    prop_oneof![
        Just(ItemStatus::Active),
        Just(ItemStatus::Inactive),
        Just(ItemStatus::Pending),
    ]
}

fn arb_filter() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::All),
        arb_status().prop_map(StatusFilter::Only),
    ]
}

fn arb_items() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(("[abAB ]{0,6}", "[abcAB ]{0,10}", arb_status(), 0i64..50), 0..30).prop_map(
        |rows| {
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            rows.into_iter()
                .enumerate()
                .map(|(index, (title, description, status, offset))| {
                    item(
                        &index.to_string(),
                        &title,
                        &description,
                        status,
                        base + Duration::hours(offset),
                    )
                })
                .collect()
        },
    )
}

fn arb_spec() -> impl Strategy<Value = FilterSpec> {
    ("[abAB]{0,2}", arb_filter(), 1u32..6, 1u32..8).prop_map(|(search, status, page, limit)| FilterSpec {
        search,
        status,
        page,
        limit,
    })
}

fn matches(item: &Item, spec: &FilterSpec) -> bool {
    let needle = spec.search.to_lowercase();
    let text_ok = needle.is_empty()
        || item.title.to_lowercase().contains(&needle)
        || item.description.to_lowercase().contains(&needle);
    text_ok && spec.status.matches(item.status)
}

proptest! {
    #[test]
    fn total_counts_exactly_the_matching_items(items in arb_items(), spec in arb_spec()) {
        let result = query(&items, &spec);
        let expected = items.iter().filter(|item| matches(item, &spec)).count();
        prop_assert_eq!(result.total, expected);
        for returned in &result.items {
            prop_assert!(matches(returned, &spec));
        }
    }

    #[test]
    fn pages_are_sorted_newest_first(items in arb_items(), spec in arb_spec()) {
        let result = query(&items, &spec);
        for pair in result.items.windows(2) {
            prop_assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn pagination_arithmetic_holds(items in arb_items(), spec in arb_spec()) {
        let result = query(&items, &spec);
        let limit = spec.limit as usize;
        prop_assert_eq!(result.total_pages as usize, result.total.div_ceil(limit));
        let skipped = (spec.page as usize - 1) * limit;
        let expected_len = limit.min(result.total.saturating_sub(skipped));
        prop_assert_eq!(result.items.len(), expected_len);
    }

    #[test]
    fn pages_partition_the_filtered_set(items in arb_items(), spec in arb_spec()) {
        let first = query(&items, &FilterSpec { page: 1, ..spec.clone() });
        let mut seen = Vec::new();
        for page in 1..=first.total_pages.max(1) {
            let result = query(&items, &FilterSpec { page, ..spec.clone() });
            seen.extend(result.items.into_iter().map(|item| item.id));
        }
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), first.total);
    }

    #[test]
    fn repeated_queries_are_identical(items in arb_items(), spec in arb_spec()) {
        prop_assert_eq!(query(&items, &spec), query(&items, &spec));
    }
}
