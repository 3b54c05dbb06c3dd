//! Dashboard core: item query engine, pure request state machine and view-model helpers.
mod effect;
mod error;
mod filter;
mod item;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{FieldError, FieldProblem, NotFoundError, ValidationError};
pub use filter::{FilterPatch, FilterSpec, RawListParams, StatusFilter, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use item::{
    CreateItemRequest, Item, ItemId, ItemStatus, NewItem, DESCRIPTION_LEN, TITLE_LEN,
};
pub use msg::Msg;
pub use query::{find_by_id, query, total_pages, ItemCollection, PageResult};
pub use state::{AppState, Operation, RequestId, RequestStatus, StoreSettings, SEARCH_DEBOUNCE};
pub use update::update;
pub use view_model::{AppViewModel, ItemRowView, ListView, PaginationView, PAGE_WINDOW};
