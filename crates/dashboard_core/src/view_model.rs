use chrono::{DateTime, Utc};

use crate::{AppState, FilterSpec, Item, ItemId, ItemStatus, Operation, ValidationError};

/// Maximum number of page buttons shown at once.
pub const PAGE_WINDOW: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub list: ListView,
    pub loading: bool,
    /// Dismissible error shown above data that is already on screen.
    pub error_banner: Option<String>,
    /// The `retry` action reloads the list, so it only repeats a failed list fetch.
    pub error_retries_request: bool,
    pub pagination: Option<PaginationView>,
    pub selected_item: Option<Item>,
    pub search_input: String,
    pub filters: FilterSpec,
    pub has_active_filters: bool,
    pub total: usize,
    pub form_errors: Option<ValidationError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Skeleton placeholder: a fetch is running and nothing is on screen yet.
    Loading,
    /// Full-view failure with a retry prompt; no data to fall back on.
    Failed { message: String },
    /// Filters are active but nothing matched.
    NoMatches,
    /// The collection is empty.
    NoItems,
    Items(Vec<ItemRowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page: u32,
    pub total_pages: u32,
    pub showing_from: usize,
    pub showing_to: usize,
    pub total: usize,
    pub page_numbers: Vec<u32>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let loading = state.loading();
        let items = state.items();
        let has_active_filters = state.filters().has_active_filters();

        let list = match state.error() {
            Some(message) if !loading && items.is_empty() => ListView::Failed {
                message: message.to_string(),
            },
            _ if loading && items.is_empty() => ListView::Loading,
            _ if items.is_empty() && has_active_filters => ListView::NoMatches,
            _ if items.is_empty() && state.total() == 0 => ListView::NoItems,
            _ => ListView::Items(items.iter().map(ItemRowView::from).collect()),
        };

        let error_banner = state
            .error()
            .filter(|_| !items.is_empty())
            .map(ToOwned::to_owned);

        Self {
            list,
            loading,
            error_banner,
            error_retries_request: state.error_source() == Some(Operation::ListFetch),
            pagination: PaginationView::build(state.page(), state.limit(), state.total(), state.total_pages()),
            selected_item: state.selected_item().cloned(),
            search_input: state.search_input().to_string(),
            filters: state.filters().clone(),
            has_active_filters,
            total: state.total(),
            form_errors: state.form_errors().cloned(),
        }
    }
}

impl From<&Item> for ItemRowView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            status: item.status,
            created_at: item.created_at,
        }
    }
}

impl PaginationView {
    /// Hidden when everything fits on one page.
    pub fn build(page: u32, limit: u32, total: usize, total_pages: u32) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }
        let limit = limit.max(1) as usize;
        let page = page.max(1);
        let showing_from = (page as usize - 1) * limit + 1;
        let showing_to = (page as usize * limit).min(total);

        Some(Self {
            page,
            total_pages,
            showing_from,
            showing_to,
            total,
            page_numbers: page_window(page, total_pages),
            can_go_back: page > 1,
            can_go_forward: page < total_pages,
        })
    }
}

/// Up to [`PAGE_WINDOW`] consecutive page numbers, keeping the current page
/// centred except near either end.
fn page_window(page: u32, total_pages: u32) -> Vec<u32> {
    let count = PAGE_WINDOW.min(total_pages);
    let first = if total_pages <= PAGE_WINDOW || page <= 3 {
        1
    } else if page >= total_pages - 2 {
        total_pages - PAGE_WINDOW + 1
    } else {
        page - 2
    };
    (first..first + count).collect()
}
