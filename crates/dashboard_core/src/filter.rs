use std::fmt;

use serde::Deserialize;

use crate::item::ItemStatus;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ItemStatus),
}

impl StatusFilter {
    pub fn matches(self, status: ItemStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// Parses a query-string value; anything unrecognised means "all".
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().parse::<ItemStatus>() {
            Ok(status) => StatusFilter::Only(status),
            Err(()) => StatusFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The (search, status, page, limit) tuple driving a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSpec {
    pub search: String,
    pub status: StatusFilter,
    pub page: u32,
    pub limit: u32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FilterSpec {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    /// Builds a spec from untrusted list parameters.
    ///
    /// Missing, non-numeric or zero `page`/`limit` values fall back to the
    /// defaults; an unknown status falls back to "all".
    pub fn from_params(params: &RawListParams) -> Self {
        Self {
            search: params.search.clone().unwrap_or_default(),
            status: params
                .status
                .as_deref()
                .map(StatusFilter::parse_lenient)
                .unwrap_or_default(),
            page: parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(params.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Query-string pairs for this spec. Empty search and "all" are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let StatusFilter::Only(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty() || self.status != StatusFilter::All
    }

    /// Shallow merge: only the fields present in `patch` change.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(page) = patch.page {
            self.page = page.max(1);
        }
        if let Some(limit) = patch.limit {
            self.limit = limit.max(1);
        }
    }
}

/// Partial filter update applied by [`FilterSpec::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// List parameters exactly as received, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RawListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse::<u32>().ok().filter(|value| *value >= 1)
}
