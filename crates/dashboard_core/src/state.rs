use std::collections::BTreeSet;
use std::time::Duration;

use dashboard_logging::dash_debug;

use crate::error::ValidationError;
use crate::filter::{FilterPatch, FilterSpec, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::item::Item;
use crate::query::{total_pages, PageResult};
use crate::view_model::AppViewModel;

pub type RequestId = u64;

/// Quiet period between the last search keystroke and the list fetch it triggers.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// The asynchronous operation kinds tracked by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListFetch,
    Create,
    FetchById,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    pub page_size: u32,
    pub search_debounce: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_LIMIT,
            search_debounce: SEARCH_DEBOUNCE,
        }
    }
}

/// Lifecycle of one operation kind.
///
/// A superseding tracker forgets older requests when a new one is issued, so
/// their late resolutions are ignored. A non-superseding tracker (creates)
/// keeps every request until it settles.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestTracker {
    supersedes: bool,
    outstanding: BTreeSet<RequestId>,
    last_outcome: RequestStatus,
}

impl RequestTracker {
    fn new(supersedes: bool) -> Self {
        Self {
            supersedes,
            outstanding: BTreeSet::new(),
            last_outcome: RequestStatus::Idle,
        }
    }

    fn issue(&mut self, request_id: RequestId) {
        if self.supersedes {
            self.outstanding.clear();
        }
        self.outstanding.insert(request_id);
    }

    /// Returns false when the request is unknown or was superseded.
    fn settle(&mut self, request_id: RequestId, outcome: RequestStatus) -> bool {
        if self.outstanding.remove(&request_id) {
            self.last_outcome = outcome;
            true
        } else {
            false
        }
    }

    fn status(&self) -> RequestStatus {
        if self.outstanding.is_empty() {
            self.last_outcome
        } else {
            RequestStatus::Pending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    items: Vec<Item>,
    total: usize,
    page: u32,
    limit: u32,
    total_pages: u32,
    error: Option<String>,
    error_source: Option<Operation>,
    filters: FilterSpec,
    selected_item: Option<Item>,
    list: RequestTracker,
    create: RequestTracker,
    detail: RequestTracker,
    next_request_id: RequestId,
    search_input: String,
    debounce_generation: u64,
    search_debounce: Duration,
    form_errors: Option<ValidationError>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(StoreSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: StoreSettings) -> Self {
        let limit = settings.page_size.max(1);
        Self {
            items: Vec::new(),
            total: 0,
            page: DEFAULT_PAGE,
            limit,
            total_pages: 0,
            error: None,
            error_source: None,
            filters: FilterSpec::with_limit(limit),
            selected_item: None,
            list: RequestTracker::new(true),
            create: RequestTracker::new(false),
            detail: RequestTracker::new(true),
            next_request_id: 1,
            search_input: String::new(),
            debounce_generation: 0,
            search_debounce: settings.search_debounce,
            form_errors: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// True while any operation kind has a request in flight.
    pub fn loading(&self) -> bool {
        [&self.list, &self.create, &self.detail]
            .iter()
            .any(|tracker| tracker.status() == RequestStatus::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Which operation produced the current error.
    pub fn error_source(&self) -> Option<Operation> {
        self.error_source
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.selected_item.as_ref()
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    pub fn form_errors(&self) -> Option<&ValidationError> {
        self.form_errors.as_ref()
    }

    pub fn status(&self, operation: Operation) -> RequestStatus {
        self.tracker(operation).status()
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn tracker(&self, operation: Operation) -> &RequestTracker {
        match operation {
            Operation::ListFetch => &self.list,
            Operation::Create => &self.create,
            Operation::FetchById => &self.detail,
        }
    }

    fn tracker_mut(&mut self, operation: Operation) -> &mut RequestTracker {
        match operation {
            Operation::ListFetch => &mut self.list,
            Operation::Create => &mut self.create,
            Operation::FetchById => &mut self.detail,
        }
    }

    /// Pending transition: allocates an id, marks the operation in flight and clears the error.
    pub(crate) fn begin(&mut self, operation: Operation) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.tracker_mut(operation).issue(request_id);
        self.error = None;
        self.error_source = None;
        self.dirty = true;
        dash_debug!("{:?} request {} pending", operation, request_id);
        request_id
    }

    /// Settles a request; false means the resolution is stale and must be dropped.
    fn settle(&mut self, operation: Operation, request_id: RequestId, outcome: RequestStatus) -> bool {
        let accepted = self.tracker_mut(operation).settle(request_id, outcome);
        if accepted {
            self.dirty = true;
        } else {
            dash_debug!(
                "Ignoring stale {:?} resolution for request {}",
                operation,
                request_id
            );
        }
        accepted
    }

    pub(crate) fn apply_list(&mut self, request_id: RequestId, result: Result<PageResult, String>) {
        let outcome = outcome_of(&result);
        if !self.settle(Operation::ListFetch, request_id, outcome) {
            return;
        }
        match result {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.page = page.page;
                self.limit = page.limit;
                self.total_pages = page.total_pages;
            }
            Err(detail) => self.fail(Operation::ListFetch, "Failed to fetch items", &detail),
        }
    }

    pub(crate) fn apply_created(&mut self, request_id: RequestId, result: Result<Item, String>) {
        let outcome = outcome_of(&result);
        if !self.settle(Operation::Create, request_id, outcome) {
            return;
        }
        match result {
            Ok(item) => {
                self.items.insert(0, item);
                self.total += 1;
                self.total_pages = total_pages(self.total, self.limit);
            }
            Err(detail) => self.fail(Operation::Create, "Failed to create item", &detail),
        }
    }

    pub(crate) fn apply_fetched_item(&mut self, request_id: RequestId, result: Result<Item, String>) {
        let outcome = outcome_of(&result);
        if !self.settle(Operation::FetchById, request_id, outcome) {
            return;
        }
        match result {
            Ok(item) => self.selected_item = Some(item),
            Err(detail) => self.fail(Operation::FetchById, "Failed to fetch item", &detail),
        }
    }

    pub(crate) fn patch_filters(&mut self, patch: FilterPatch) {
        let before = self.filters.clone();
        self.filters.merge(patch);
        if self.filters != before {
            self.dirty = true;
        }
    }

    pub(crate) fn set_selected_item(&mut self, item: Option<Item>) {
        if self.selected_item != item {
            self.selected_item = item;
            self.dirty = true;
        }
    }

    pub(crate) fn clear_error(&mut self) {
        self.error_source = None;
        if self.error.take().is_some() {
            self.dirty = true;
        }
    }

    fn fail(&mut self, operation: Operation, summary: &str, detail: &str) {
        self.error = Some(failure_message(summary, detail));
        self.error_source = Some(operation);
    }

    pub(crate) fn set_form_errors(&mut self, errors: Option<ValidationError>) {
        if self.form_errors != errors {
            self.form_errors = errors;
            self.dirty = true;
        }
    }

    pub(crate) fn set_search_input(&mut self, text: String) {
        if self.search_input != text {
            self.search_input = text;
            self.dirty = true;
        }
    }

    /// Starts a new debounce window; earlier windows become stale.
    pub(crate) fn restart_debounce(&mut self) -> u64 {
        self.debounce_generation += 1;
        self.debounce_generation
    }

    pub(crate) fn is_current_debounce(&self, generation: u64) -> bool {
        generation == self.debounce_generation
    }
}

fn outcome_of<T>(result: &Result<T, String>) -> RequestStatus {
    if result.is_ok() {
        RequestStatus::Fulfilled
    } else {
        RequestStatus::Rejected
    }
}

fn failure_message(summary: &str, detail: &str) -> String {
    let detail = detail.trim();
    if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}: {detail}")
    }
}
