//! HTTP client module
//!
//! Thin asynchronous client used by the paged fetch loop. One request is
//! outstanding at a time; transport failures and non-success statuses map
//! to [`crate::Error`] variants and are never retried here.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
