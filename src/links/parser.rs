//! `Link` header extraction
//!
//! Parses the RFC 5988 subset used by list endpoints: comma-separated
//! `<url>; rel="name"` entries. Extraction is best-effort throughout —
//! malformed entries, unknown relations and unparseable URLs are skipped,
//! never fatal.

use super::types::{PageLinks, PageRel};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::HeaderMap;
use url::Url;

/// One `<url>; rel="name"` entry; quotes around the rel value are optional.
static LINK_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="?([A-Za-z]+)"?"#).expect("valid regex"));

impl PageLinks {
    /// Extract a link set from a raw `Link` header value.
    ///
    /// Entries that do not match the expected shape leave their relation
    /// absent. An empty or garbage header yields an empty set.
    pub fn parse(header: &str) -> Self {
        let mut links = Self::new();

        for caps in LINK_ENTRY.captures_iter(header) {
            let Some(rel) = PageRel::from_rel(&caps[2]) else {
                continue;
            };
            // Relative or otherwise unparseable URLs are dropped; the set
            // only carries absolute page URLs.
            if let Ok(url) = Url::parse(&caps[1]) {
                links.set(rel, url);
            }
        }

        links
    }

    /// Extract a link set from a response's headers.
    ///
    /// A missing `Link` header (or one with a non-ASCII value) yields an
    /// empty set, signaling a single page.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map_or_else(Self::new, Self::parse)
    }
}
