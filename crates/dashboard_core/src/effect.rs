use std::time::Duration;

use crate::{CreateItemRequest, FilterSpec, ItemId, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchItems {
        request_id: RequestId,
        filters: FilterSpec,
    },
    CreateItem {
        request_id: RequestId,
        request: CreateItemRequest,
    },
    FetchItem {
        request_id: RequestId,
        id: ItemId,
    },
    /// Restart the single search timer; report the generation when it fires.
    ScheduleSearchDebounce { generation: u64, delay: Duration },
    CancelSearchDebounce,
}
