mod common;

use std::sync::Once;

use dashboard_core::{
    query, update, AppState, Effect, FilterPatch, FilterSpec, ItemStatus, ListView, Msg, Operation,
    RequestId, RequestStatus, StatusFilter,
};
use pretty_assertions::assert_eq;

use common::{ids, seed_items};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

fn issued_fetch(effects: &[Effect]) -> (RequestId, FilterSpec) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchItems {
                request_id,
                filters,
            } => Some((*request_id, filters.clone())),
            _ => None,
        })
        .expect("fetch effect")
}

fn resolve(state: AppState, request_id: RequestId, filters: &FilterSpec) -> AppState {
    let page = query(&seed_items(), filters);
    let (state, effects) = update(
        state,
        Msg::ListFetched {
            request_id,
            result: Ok(page),
        },
    );
    assert!(effects.is_empty());
    state
}

fn loaded(filters: FilterSpec) -> AppState {
    let state = AppState::new();
    let (state, _) = update(state, Msg::FiltersPatched(patch_from(filters)));
    let (state, effects) = update(state, Msg::FetchRequested);
    let (request_id, filters) = issued_fetch(&effects);
    resolve(state, request_id, &filters)
}

fn patch_from(spec: FilterSpec) -> FilterPatch {
    FilterPatch {
        search: Some(spec.search),
        status: Some(spec.status),
        page: Some(spec.page),
        limit: Some(spec.limit),
    }
}

#[test]
fn initial_fetch_goes_pending_then_fulfilled() {
    init_logging();
    let state = AppState::new();
    assert_eq!(state.status(Operation::ListFetch), RequestStatus::Idle);

    let (mut state, effects) = update(state, Msg::FetchRequested);
    let (request_id, filters) = issued_fetch(&effects);
    assert_eq!(filters, FilterSpec::default());
    assert!(state.loading());
    assert_eq!(state.error(), None);
    assert_eq!(state.view().list, ListView::Loading);
    assert!(state.consume_dirty());

    let mut state = resolve(state, request_id, &filters);
    assert!(!state.loading());
    assert_eq!(state.status(Operation::ListFetch), RequestStatus::Fulfilled);
    assert_eq!(state.total(), 8);
    assert_eq!(state.total_pages(), 1);
    assert_eq!(state.items().len(), 8);
    assert!(state.consume_dirty());
}

#[test]
fn rejection_sets_readable_error_and_clears_loading() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::FetchRequested);
    let (request_id, _) = issued_fetch(&effects);

    let (state, _) = update(
        state,
        Msg::ListFetched {
            request_id,
            result: Err("http status 500".to_string()),
        },
    );

    assert!(!state.loading());
    assert_eq!(state.status(Operation::ListFetch), RequestStatus::Rejected);
    assert_eq!(state.error(), Some("Failed to fetch items: http status 500"));
    assert_eq!(
        state.view().list,
        ListView::Failed {
            message: "Failed to fetch items: http status 500".to_string()
        }
    );
}

#[test]
fn retry_replays_the_same_filters_and_clears_error() {
    init_logging();
    let state = loaded(FilterSpec {
        status: StatusFilter::Only(ItemStatus::Pending),
        ..FilterSpec::default()
    });
    let (state, effects) = update(state, Msg::FetchRequested);
    let (request_id, first_filters) = issued_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::ListFetched {
            request_id,
            result: Err("network error".to_string()),
        },
    );
    assert!(state.error().is_some());

    let (state, effects) = update(state, Msg::FetchRequested);
    let (_, retry_filters) = issued_fetch(&effects);
    assert_eq!(retry_filters, first_filters);
    assert_eq!(state.error(), None);
    assert!(state.loading());
}

#[test]
fn error_with_data_on_screen_is_a_banner() {
    init_logging();
    let state = loaded(FilterSpec::default());
    let (state, effects) = update(state, Msg::FetchRequested);
    let (request_id, _) = issued_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::ListFetched {
            request_id,
            result: Err("timeout".to_string()),
        },
    );

    let view = state.view();
    assert_eq!(view.error_banner.as_deref(), Some("Failed to fetch items: timeout"));
    assert!(matches!(view.list, ListView::Items(ref rows) if rows.len() == 8));
    assert!(view.error_retries_request);

    let (state, _) = update(state, Msg::ErrorDismissed);
    assert_eq!(state.error(), None);
    assert_eq!(state.error_source(), None);
    assert_eq!(state.view().error_banner, None);
    assert_eq!(state.items().len(), 8);
}

#[test]
fn stale_list_response_is_ignored() {
    init_logging();
    let state = loaded(FilterSpec::default());

    let (state, effects) = update(state, Msg::StatusFilterChanged(StatusFilter::Only(ItemStatus::Active)));
    let (active_id, active_filters) = issued_fetch(&effects);
    let (state, effects) = update(state, Msg::StatusFilterChanged(StatusFilter::Only(ItemStatus::Inactive)));
    let (inactive_id, inactive_filters) = issued_fetch(&effects);
    assert!(inactive_id > active_id);

    // Newer request resolves first, older one last.
    let mut state = resolve(state, inactive_id, &inactive_filters);
    assert_eq!(ids(state.items()), vec!["3", "7"]);
    assert!(state.consume_dirty());

    let before = state.clone();
    let (mut state, _) = update(
        state,
        Msg::ListFetched {
            request_id: active_id,
            result: Ok(query(&seed_items(), &active_filters)),
        },
    );
    assert_eq!(ids(state.items()), vec!["3", "7"]);
    assert_eq!(state.total(), before.total());
    assert!(!state.loading());
    assert!(!state.consume_dirty());
}

#[test]
fn stale_rejection_does_not_clobber_newer_success() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::FetchRequested);
    let (old_id, _) = issued_fetch(&effects);
    let (state, effects) = update(state, Msg::FetchRequested);
    let (new_id, filters) = issued_fetch(&effects);

    let state = resolve(state, new_id, &filters);
    let (state, _) = update(
        state,
        Msg::ListFetched {
            request_id: old_id,
            result: Err("late failure".to_string()),
        },
    );
    assert_eq!(state.error(), None);
    assert_eq!(state.status(Operation::ListFetch), RequestStatus::Fulfilled);
}

#[test]
fn status_change_resets_page_to_one() {
    init_logging();
    let state = loaded(FilterSpec {
        limit: 3,
        ..FilterSpec::default()
    });
    let (state, effects) = update(state, Msg::PageRequested(2));
    let (request_id, filters) = issued_fetch(&effects);
    assert_eq!(filters.page, 2);
    let state = resolve(state, request_id, &filters);
    assert_eq!(state.page(), 2);

    let (state, effects) = update(state, Msg::StatusFilterChanged(StatusFilter::Only(ItemStatus::Pending)));
    let (_, filters) = issued_fetch(&effects);
    assert_eq!(filters.page, 1);
    assert_eq!(filters.limit, 3);
    assert_eq!(state.filters().status, StatusFilter::Only(ItemStatus::Pending));
}

#[test]
fn out_of_range_page_requests_are_ignored() {
    init_logging();
    let state = loaded(FilterSpec {
        limit: 5,
        ..FilterSpec::default()
    });
    assert_eq!(state.total_pages(), 2);

    for page in [0, 3, 100] {
        let (next, effects) = update(state.clone(), Msg::PageRequested(page));
        assert!(effects.is_empty(), "page {page}");
        assert_eq!(next.filters().page, 1);
    }
}

#[test]
fn page_change_fulfils_with_remaining_items() {
    init_logging();
    let state = loaded(FilterSpec {
        limit: 5,
        ..FilterSpec::default()
    });
    let (state, effects) = update(state, Msg::PageRequested(2));
    let (request_id, filters) = issued_fetch(&effects);
    let state = resolve(state, request_id, &filters);

    assert_eq!(ids(state.items()), vec!["6", "7", "8"]);
    let pagination = state.view().pagination.expect("two pages");
    assert_eq!(pagination.showing_from, 6);
    assert_eq!(pagination.showing_to, 8);
    assert_eq!(pagination.total, 8);
}

#[test]
fn clear_all_filters_keeps_limit() {
    init_logging();
    let state = loaded(FilterSpec {
        search: "data".into(),
        status: StatusFilter::Only(ItemStatus::Active),
        page: 1,
        limit: 4,
    });
    let (state, effects) = update(state, Msg::FiltersCleared);
    assert_eq!(effects[0], Effect::CancelSearchDebounce);
    let (_, filters) = issued_fetch(&effects);
    assert_eq!(
        filters,
        FilterSpec {
            search: String::new(),
            status: StatusFilter::All,
            page: 1,
            limit: 4,
        }
    );
    assert!(!state.view().has_active_filters);
}

#[test]
fn filters_patch_merges_without_fetching() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::FiltersPatched(FilterPatch {
            limit: Some(20),
            ..FilterPatch::default()
        }),
    );
    assert!(effects.is_empty());
    assert_eq!(state.filters().limit, 20);
    assert_eq!(state.filters().page, 1);
    assert!(!state.loading());
}

#[test]
fn active_filters_with_no_results_show_no_matches() {
    init_logging();
    let state = loaded(FilterSpec {
        search: "nothing matches this".into(),
        ..FilterSpec::default()
    });
    assert_eq!(state.total(), 0);
    assert_eq!(state.view().list, ListView::NoMatches);
}

#[test]
fn empty_collection_shows_no_items() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::FetchRequested);
    let (request_id, filters) = issued_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::ListFetched {
            request_id,
            result: Ok(query(&[], &filters)),
        },
    );
    assert_eq!(state.view().list, ListView::NoItems);
    assert_eq!(state.view().pagination, None);
}
