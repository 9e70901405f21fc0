//! Pagination link extraction
//!
//! # Overview
//!
//! List endpoints advertise their neighboring pages through the HTTP `Link`
//! response header (RFC 5988 style). This module decodes that header into a
//! [`PageLinks`] set mapping the fixed relations `first`, `prev`, `next`,
//! `last` and `current` to absolute URLs. The `next` relation drives the
//! paged fetch loop; its absence terminates iteration.

mod parser;
mod types;

pub use types::{PageLinks, PageRel};
