//! Paged fetch types
//!
//! Configuration, per-page and accumulated result types for the walk loop.

use crate::decode::BodyFormat;
use crate::links::PageLinks;
use crate::types::{JsonValue, StringMap};

/// One decoded page: its items and the link set of the response that
/// produced it
#[derive(Debug, Clone)]
pub struct Page {
    /// Decoded items, in server order
    pub items: Vec<JsonValue>,
    /// Pagination links extracted from the response
    pub links: PageLinks,
}

impl Page {
    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the page carried no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The accumulated result of a full pagination walk.
///
/// Items appear in page order; concatenated pages are the full collection
/// as of request time. Ordering within and across pages is the server's.
#[derive(Debug, Clone)]
pub struct PagedResult {
    /// All items from all fetched pages, in page order
    pub items: Vec<JsonValue>,
    /// Link set of the last fetched page
    pub links: PageLinks,
    /// Walk statistics
    pub stats: WalkStats,
}

/// Statistics for one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Pages fetched
    pub pages_fetched: u32,
    /// Items accumulated across pages
    pub items_fetched: usize,
    /// Wall-clock duration of the walk in milliseconds
    pub duration_ms: u64,
}

impl WalkStats {
    pub(crate) fn add_page(&mut self, items: usize) {
        self.pages_fetched += 1;
        self.items_fetched += items;
    }
}

/// Caller decision after each fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Follow the `next` link if one exists
    Continue,
    /// Stop after this page; its items are kept
    Stop,
}

impl Continuation {
    /// Check if this is a stop decision
    pub fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Configuration for a pagination walk
#[derive(Debug, Clone, Default)]
pub struct WalkConfig {
    /// Maximum pages to fetch (0 = unbounded)
    pub max_pages: u32,
    /// Maximum items to accumulate (0 = unbounded); excess items on the
    /// final page are truncated
    pub max_items: usize,
    /// Fixed body format, skipping content negotiation
    pub format: Option<BodyFormat>,
    /// Dot-notation path to the items within JSON bodies
    pub item_path: Option<String>,
    /// Headers sent with every page request
    pub headers: StringMap,
}

impl WalkConfig {
    /// Create a new walk config
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of pages fetched
    #[must_use]
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Limit the number of items accumulated
    #[must_use]
    pub fn max_items(mut self, items: usize) -> Self {
        self.max_items = items;
        self
    }

    /// Force a body format instead of negotiating from `Content-Type`
    #[must_use]
    pub fn format(mut self, format: BodyFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Extract JSON items from a dot-notation path (e.g. `"data.items"`)
    #[must_use]
    pub fn item_path(mut self, path: impl Into<String>) -> Self {
        self.item_path = Some(path.into());
        self
    }

    /// Send a header with every page request
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}
