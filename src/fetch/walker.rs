//! The paged fetch loop

use super::types::{Continuation, Page, PagedResult, WalkConfig, WalkStats};
use crate::decode::{decoder_for, BodyDecoder, BodyFormat, JsonDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::links::PageLinks;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, warn};

/// Walks a paginated list endpoint page by page.
///
/// Pages are fetched strictly sequentially, one outstanding request at a
/// time: memory use is bounded by a single response plus the accumulated
/// items, and a caller may abandon the walk between pages but not
/// mid-request. A failure on any page — transport or decode — aborts the
/// walk and discards everything accumulated so far; the first error is the
/// only result.
pub struct PageWalker {
    client: HttpClient,
    config: WalkConfig,
}

impl PageWalker {
    /// Create a walker over the given client
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            config: WalkConfig::default(),
        }
    }

    /// Set the walk configuration
    #[must_use]
    pub fn with_config(mut self, config: WalkConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Fetch and decode a single page.
    ///
    /// The body format is negotiated from the response `Content-Type`
    /// unless the config pins one; the link set comes from the `Link`
    /// header of this response.
    pub async fn fetch_page(&self, url: &str) -> Result<Page> {
        let mut request = RequestConfig::new();
        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        let response = self.client.get_with_config(url, request).await?;

        let format = self
            .config
            .format
            .unwrap_or_else(|| BodyFormat::negotiate(response.headers()));
        let links = PageLinks::from_headers(response.headers());

        let body = response.text().await.map_err(Error::Http)?;
        let items = self.decoder(format).decode(&body)?;

        Ok(Page { items, links })
    }

    /// Fetch every page starting at `url`, following `next` links until
    /// none remains, and return the accumulated result.
    pub async fn fetch_all(&self, url: &str) -> Result<PagedResult> {
        self.fetch_while(url, |_| Continuation::Continue).await
    }

    /// Fetch pages starting at `url` with caller-driven continuation.
    ///
    /// After each decoded page the control closure decides whether to
    /// follow the `next` link. The inspected page's items are always part
    /// of the result; stopping only prevents further requests.
    pub async fn fetch_while<F>(&self, url: &str, mut control: F) -> Result<PagedResult>
    where
        F: FnMut(&Page) -> Continuation,
    {
        let start = Instant::now();
        let mut stats = WalkStats::default();
        let mut items = Vec::new();
        let mut next_url = url.to_string();

        let links = loop {
            let page = self.fetch_page(&next_url).await?;
            stats.add_page(page.len());
            debug!(
                "Page {}: fetched {} items from {}",
                stats.pages_fetched,
                page.len(),
                next_url
            );

            let decision = control(&page);
            let Page {
                items: page_items,
                links,
            } = page;
            items.extend(page_items);

            if self.config.max_items > 0 && items.len() >= self.config.max_items {
                let excess = items.len() - self.config.max_items;
                items.truncate(self.config.max_items);
                stats.items_fetched -= excess;
                warn!(
                    "Stopping walk at {} items (max_items reached)",
                    self.config.max_items
                );
                break links;
            }
            if self.config.max_pages > 0 && stats.pages_fetched >= self.config.max_pages {
                warn!(
                    "Stopping walk after {} pages (max_pages reached)",
                    stats.pages_fetched
                );
                break links;
            }
            if decision.is_stop() {
                debug!("Caller stopped walk after page {}", stats.pages_fetched);
                break links;
            }

            match links.next() {
                Some(next) => next_url = next.to_string(),
                None => break links,
            }
        };

        stats.duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Walk complete: {} items in {} pages ({}ms)",
            items.len(),
            stats.pages_fetched,
            stats.duration_ms
        );

        Ok(PagedResult {
            items,
            links,
            stats,
        })
    }

    /// Fetch every page and deserialize the accumulated items into `T`
    pub async fn fetch_all_as<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let result = self.fetch_all(url).await?;
        result
            .items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(Error::JsonParse))
            .collect()
    }

    fn decoder(&self, format: BodyFormat) -> Box<dyn BodyDecoder> {
        match (&self.config.item_path, format) {
            (Some(path), BodyFormat::Json) => Box::new(JsonDecoder::with_path(path)),
            _ => decoder_for(format),
        }
    }
}

impl std::fmt::Debug for PageWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageWalker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
