//! # pagewalk
//!
//! A toolkit for walking paginated REST list endpoints.
//!
//! List endpoints advertise neighboring pages through the HTTP `Link`
//! response header (RFC 5988 style). pagewalk fetches a collection page by
//! page, decoding each body by its declared content type and following the
//! `next` relation until none remains, accumulating one ordered result.
//!
//! ## Features
//!
//! - **Link header extraction**: `first`/`prev`/`next`/`last`/`current`
//!   relations decoded into a typed [`links::PageLinks`] set
//! - **Content negotiation**: JSON, XML and iCalendar bodies decoded into
//!   uniform JSON items
//! - **Sequential walk loop**: caller-driven continuation, page/item
//!   guards, typed accumulation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::fetch::PageWalker;
//! use pagewalk::http::{HttpClient, HttpClientConfig};
//! use pagewalk::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = HttpClientConfig::builder()
//!         .base_url("https://api.example.com")
//!         .header("Authorization", "Bearer <token>")
//!         .build();
//!     let walker = PageWalker::new(HttpClient::with_config(config));
//!
//!     let result = walker.fetch_all("/v1/courses?per_page=50").await?;
//!     println!("{} items in {} pages", result.items.len(), result.stats.pages_fetched);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       PageWalker                          │
//! │  fetch_page(url) → Page     fetch_all(url) → PagedResult  │
//! │  fetch_while(url, control)  fetch_all_as::<T>(url)        │
//! └───────────────────────────────────────────────────────────┘
//!                │               │                │
//! ┌──────────────┴──┬────────────┴─────┬──────────┴──────────┐
//! │      HTTP       │      Decode      │        Links        │
//! ├─────────────────┼──────────────────┼─────────────────────┤
//! │ GET             │ JSON             │ first / prev        │
//! │ Base URL        │ XML              │ next / last         │
//! │ Timeout         │ iCalendar        │ current             │
//! └─────────────────┴──────────────────┴─────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for pagewalk
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client
pub mod http;

/// Pagination link extraction
pub mod links;

/// Response decoders (JSON, XML, iCalendar)
pub mod decode;

/// Paged fetch loop
pub mod fetch;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};
pub use fetch::{Continuation, Page, PagedResult, PageWalker, WalkConfig};
pub use links::{PageLinks, PageRel};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
