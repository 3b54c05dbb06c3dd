use dashboard_logging::dash_debug;

use crate::{AppState, Effect, FilterPatch, Msg, Operation, StatusFilter};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FetchRequested => vec![fetch_items(&mut state)],
        Msg::SearchInputChanged(text) => {
            if text == state.search_input() {
                return (state, Vec::new());
            }
            state.set_search_input(text);
            let generation = state.restart_debounce();
            vec![Effect::ScheduleSearchDebounce {
                generation,
                delay: state.search_debounce(),
            }]
        }
        Msg::SearchDebounceElapsed { generation } => {
            if !state.is_current_debounce(generation) {
                dash_debug!("Dropping stale search debounce generation {}", generation);
                return (state, Vec::new());
            }
            if state.search_input() == state.filters().search {
                return (state, Vec::new());
            }
            let search = state.search_input().to_string();
            state.patch_filters(FilterPatch {
                search: Some(search),
                page: Some(1),
                ..FilterPatch::default()
            });
            vec![fetch_items(&mut state)]
        }
        Msg::SearchCleared => {
            state.set_search_input(String::new());
            state.restart_debounce();
            state.patch_filters(FilterPatch {
                search: Some(String::new()),
                page: Some(1),
                ..FilterPatch::default()
            });
            vec![Effect::CancelSearchDebounce, fetch_items(&mut state)]
        }
        Msg::StatusFilterChanged(status) => {
            state.patch_filters(FilterPatch {
                status: Some(status),
                page: Some(1),
                ..FilterPatch::default()
            });
            vec![fetch_items(&mut state)]
        }
        Msg::FiltersCleared => {
            state.set_search_input(String::new());
            state.restart_debounce();
            state.patch_filters(FilterPatch {
                search: Some(String::new()),
                status: Some(StatusFilter::All),
                page: Some(1),
                limit: None,
            });
            vec![Effect::CancelSearchDebounce, fetch_items(&mut state)]
        }
        Msg::PageRequested(page) => {
            if page == 0 || page > state.total_pages() {
                return (state, Vec::new());
            }
            state.patch_filters(FilterPatch {
                page: Some(page),
                ..FilterPatch::default()
            });
            vec![fetch_items(&mut state)]
        }
        Msg::CreateSubmitted(request) => match request.validate() {
            Err(errors) => {
                state.set_form_errors(Some(errors));
                Vec::new()
            }
            Ok(_) => {
                state.set_form_errors(None);
                let request_id = state.begin(Operation::Create);
                vec![Effect::CreateItem {
                    request_id,
                    request,
                }]
            }
        },
        Msg::CreateFormClosed => {
            state.set_form_errors(None);
            state.clear_error();
            Vec::new()
        }
        Msg::DetailsRequested(id) => {
            let request_id = state.begin(Operation::FetchById);
            vec![Effect::FetchItem { request_id, id }]
        }
        Msg::FiltersPatched(patch) => {
            state.patch_filters(patch);
            Vec::new()
        }
        Msg::ItemSelected(item) => {
            state.set_selected_item(item);
            Vec::new()
        }
        Msg::ErrorDismissed => {
            state.clear_error();
            Vec::new()
        }
        Msg::ListFetched { request_id, result } => {
            state.apply_list(request_id, result);
            Vec::new()
        }
        Msg::ItemCreated { request_id, result } => {
            state.apply_created(request_id, result);
            Vec::new()
        }
        Msg::ItemFetched { request_id, result } => {
            state.apply_fetched_item(request_id, result);
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn fetch_items(state: &mut AppState) -> Effect {
    let request_id = state.begin(Operation::ListFetch);
    Effect::FetchItems {
        request_id,
        filters: state.filters().clone(),
    }
}
