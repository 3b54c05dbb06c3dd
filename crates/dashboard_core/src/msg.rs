use crate::{CreateItemRequest, FilterPatch, Item, ItemId, PageResult, RequestId, StatusFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Load or reload the list with the current filters (initial load, retry).
    FetchRequested,
    /// User edited the search box (raw keystrokes, not yet applied).
    SearchInputChanged(String),
    /// The debounce window for the given generation ran out.
    SearchDebounceElapsed { generation: u64 },
    /// User cleared the search box.
    SearchCleared,
    /// User picked a status in the filter dropdown.
    StatusFilterChanged(StatusFilter),
    /// User reset search and status together.
    FiltersCleared,
    /// User navigated to a page.
    PageRequested(u32),
    /// User submitted the create form.
    CreateSubmitted(CreateItemRequest),
    /// User closed the create form.
    CreateFormClosed,
    /// User asked for the detail view of an item.
    DetailsRequested(ItemId),
    /// Shallow-merge filter changes without fetching.
    FiltersPatched(FilterPatch),
    /// Set or clear the detail-view target.
    ItemSelected(Option<Item>),
    /// User dismissed the error message.
    ErrorDismissed,
    /// A list fetch resolved.
    ListFetched {
        request_id: RequestId,
        result: Result<PageResult, String>,
    },
    /// A create resolved.
    ItemCreated {
        request_id: RequestId,
        result: Result<Item, String>,
    },
    /// A fetch-by-id resolved.
    ItemFetched {
        request_id: RequestId,
        result: Result<Item, String>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
}
