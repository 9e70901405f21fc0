//! Page link types
//!
//! Defines the relation set and the decoded link set for one response.

use url::Url;

/// Pagination relation names carried by the `Link` response header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRel {
    /// First page of the collection
    First,
    /// Page before the one just fetched
    Prev,
    /// Page after the one just fetched
    Next,
    /// Last page of the collection
    Last,
    /// The page that was just fetched
    Current,
}

impl PageRel {
    /// Parse a rel value from a `Link` header entry.
    ///
    /// Both `prev` and `previous` spellings map to [`PageRel::Prev`].
    /// Unknown relations yield `None` and are skipped by the extractor.
    pub fn from_rel(rel: &str) -> Option<Self> {
        match rel {
            "first" => Some(Self::First),
            "prev" | "previous" => Some(Self::Prev),
            "next" => Some(Self::Next),
            "last" => Some(Self::Last),
            "current" => Some(Self::Current),
            _ => None,
        }
    }

    /// The canonical rel string for this relation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
            Self::Current => "current",
        }
    }
}

/// The decoded set of pagination URLs from one response's `Link` header.
///
/// Built fresh from each response and never mutated afterwards. A relation
/// that was absent or malformed in the header is simply `None`; absence of
/// the header altogether yields an empty set, meaning a single page with no
/// further pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// URL of the first page
    pub first: Option<Url>,
    /// URL of the previous page
    pub prev: Option<Url>,
    /// URL of the next page
    pub next: Option<Url>,
    /// URL of the last page
    pub last: Option<Url>,
    /// URL of the page that produced this set
    pub current: Option<Url>,
}

impl PageLinks {
    /// Create an empty link set (single page, no further pages)
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the URL for a relation
    pub fn get(&self, rel: PageRel) -> Option<&Url> {
        match rel {
            PageRel::First => self.first.as_ref(),
            PageRel::Prev => self.prev.as_ref(),
            PageRel::Next => self.next.as_ref(),
            PageRel::Last => self.last.as_ref(),
            PageRel::Current => self.current.as_ref(),
        }
    }

    /// Shortcut for the `next` relation; drives the paged fetch loop
    pub fn next(&self) -> Option<&Url> {
        self.next.as_ref()
    }

    /// True if a further page exists
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// True if every relation is absent
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
            && self.prev.is_none()
            && self.next.is_none()
            && self.last.is_none()
            && self.current.is_none()
    }

    pub(crate) fn set(&mut self, rel: PageRel, url: Url) {
        let slot = match rel {
            PageRel::First => &mut self.first,
            PageRel::Prev => &mut self.prev,
            PageRel::Next => &mut self.next,
            PageRel::Last => &mut self.last,
            PageRel::Current => &mut self.current,
        };
        // First occurrence wins when a relation repeats
        if slot.is_none() {
            *slot = Some(url);
        }
    }
}
