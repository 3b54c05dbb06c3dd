use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{NotFoundError, ValidationError};
use crate::filter::FilterSpec;
use crate::item::{CreateItemRequest, Item};

/// One page of a filtered, newest-first listing plus counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub items: Vec<Item>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// `ceil(total / limit)`, and 0 for an empty result.
pub fn total_pages(total: usize, limit: u32) -> u32 {
    let limit = limit.max(1) as usize;
    u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX)
}

/// Filters by search and status, sorts newest first, then slices one page.
///
/// `total` counts the filtered items before pagination. A page past the end
/// yields no items but still reports the full counts.
pub fn query(collection: &[Item], spec: &FilterSpec) -> PageResult {
    let needle = spec.search.to_lowercase();

    let mut matched: Vec<&Item> = collection
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.title.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
        })
        .filter(|item| spec.status.matches(item.status))
        .collect();

    // Stable: equal timestamps keep collection order.
    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = matched.len();
    let limit = spec.limit.max(1);
    let page = spec.page.max(1);
    let start = (page as usize - 1).saturating_mul(limit as usize);

    let items = matched
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();

    PageResult {
        items,
        total,
        page,
        limit,
        total_pages: total_pages(total, limit),
    }
}

pub fn find_by_id<'a>(collection: &'a [Item], id: &str) -> Result<&'a Item, NotFoundError> {
    collection
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| NotFoundError { id: id.to_string() })
}

/// The process-wide item list and its id counter.
///
/// Items are kept most-recent-first by insertion. Ids come from a counter
/// that only moves forward, so they never depend on the collection size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemCollection {
    items: Vec<Item>,
    next_id: u64,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Wraps existing items; the counter resumes after the highest numeric id.
    pub fn with_items(items: Vec<Item>) -> Self {
        let highest = items
            .iter()
            .filter_map(|item| item.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next_id = highest.max(items.len() as u64) + 1;
        Self { items, next_id }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn query(&self, spec: &FilterSpec) -> PageResult {
        query(&self.items, spec)
    }

    pub fn find(&self, id: &str) -> Result<&Item, NotFoundError> {
        find_by_id(&self.items, id)
    }

    /// Validates `request`, assigns the next id, stamps both timestamps with
    /// `now` and puts the item at the front of the collection.
    pub fn create(
        &mut self,
        request: &CreateItemRequest,
        now: DateTime<Utc>,
    ) -> Result<Item, ValidationError> {
        let new_item = request.validate()?;
        let id = self.next_id.to_string();
        self.next_id += 1;

        let item = Item {
            id,
            title: new_item.title,
            description: new_item.description,
            status: new_item.status,
            created_at: now,
            updated_at: now,
        };
        self.items.insert(0, item.clone());
        Ok(item)
    }
}
