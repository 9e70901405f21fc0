//! Decoder types and traits
//!
//! Defines the decoder abstraction and content-type negotiation.

use crate::error::Result;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format of the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// XML format
    Xml,
    /// iCalendar format (`text/calendar`)
    Ics,
}

impl BodyFormat {
    /// Determine the format from a `Content-Type` value.
    ///
    /// Structured-syntax suffixes are honored (`application/problem+json`,
    /// `application/atom+xml`). Unknown media types yield `None`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime == "text/calendar" {
            Some(Self::Ics)
        } else if mime.ends_with("/xml") || mime.ends_with("+xml") {
            Some(Self::Xml)
        } else if mime.ends_with("/json") || mime.ends_with("+json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Negotiate the body format from response headers.
    ///
    /// A missing or unrecognized `Content-Type` falls back to JSON, the
    /// dominant format for list endpoints.
    pub fn negotiate(headers: &HeaderMap) -> Self {
        headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(Self::from_content_type)
            .unwrap_or_default()
    }
}

/// Trait for decoding response bodies into items
pub trait BodyDecoder: Send + Sync {
    /// Decode the response body into the items of one page
    fn decode(&self, body: &str) -> Result<Vec<Value>>;

    /// Decode the response body into a single JSON value (full response)
    fn decode_raw(&self, body: &str) -> Result<Value>;
}
