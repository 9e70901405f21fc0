//! Response decoder module
//!
//! Supports: JSON, XML, iCalendar
//!
//! # Overview
//!
//! The decode module turns a raw response body into the typed items of one
//! page. The format is chosen from the declared `Content-Type`
//! ([`BodyFormat::negotiate`]); each decoder implements [`BodyDecoder`] and
//! produces `serde_json::Value` items regardless of the source format.

mod decoders;
mod ics;
mod types;

pub use decoders::{JsonDecoder, XmlDecoder};
pub use ics::IcsDecoder;
pub use types::{BodyDecoder, BodyFormat};

/// Build the default decoder for a negotiated format
pub fn decoder_for(format: BodyFormat) -> Box<dyn BodyDecoder> {
    match format {
        BodyFormat::Json => Box::new(JsonDecoder::new()),
        BodyFormat::Xml => Box::new(XmlDecoder::new()),
        BodyFormat::Ics => Box::new(IcsDecoder::new()),
    }
}
