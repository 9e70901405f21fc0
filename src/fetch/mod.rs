//! Paged fetch loop
//!
//! # Overview
//!
//! The fetch module drives pagination: issue one request, decode the body
//! into items, extract the page link set, and follow the `next` relation
//! until it is absent (or the caller or a configured guard stops the walk).
//! Pages are fetched strictly sequentially. The first failure on any page
//! aborts the walk; there is no partial-success result.

mod types;
mod walker;

pub use types::{Continuation, Page, PagedResult, WalkConfig, WalkStats};
pub use walker::PageWalker;

#[cfg(test)]
mod tests;
