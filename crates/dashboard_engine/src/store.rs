use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use dashboard_core::{
    CreateItemRequest, FilterSpec, Item, ItemCollection, NotFoundError, PageResult,
    ValidationError,
};
use dashboard_logging::{dash_debug, dash_info};

use crate::seed::seed_items;

/// Source of creation timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Shared, process-lifetime item collection.
///
/// Creates take the write lock for the whole validate-assign-insert step, so
/// concurrent creates always receive distinct ids.
pub struct ItemStore {
    collection: RwLock<ItemCollection>,
    clock: Clock,
}

impl ItemStore {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            collection: RwLock::new(ItemCollection::with_items(items)),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_items())
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn list(&self, spec: &FilterSpec) -> PageResult {
        let collection = self.collection.read().unwrap_or_else(PoisonError::into_inner);
        let page = collection.query(spec);
        dash_debug!(
            "list search={:?} status={} page={} limit={} -> {} of {}",
            spec.search,
            spec.status,
            spec.page,
            spec.limit,
            page.items.len(),
            page.total
        );
        page
    }

    pub fn get(&self, id: &str) -> Result<Item, NotFoundError> {
        let collection = self.collection.read().unwrap_or_else(PoisonError::into_inner);
        collection.find(id).cloned()
    }

    pub fn create(&self, request: &CreateItemRequest) -> Result<Item, ValidationError> {
        let now = (self.clock)();
        let mut collection = self
            .collection
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let item = collection.create(request, now)?;
        dash_info!("created item {} ({:?})", item.id, item.title);
        Ok(item)
    }

    pub fn len(&self) -> usize {
        self.collection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
