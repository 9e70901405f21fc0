//! iCalendar decoder
//!
//! Turns a `text/calendar` body into dictionary records. Folded lines are
//! unfolded per RFC 5545 §3.1, `NAME;PARAM=...:VALUE` content lines become
//! object entries keyed by the property name, and nested components
//! (`BEGIN:X` .. `END:X`) become nested objects. Repeated properties and
//! components collapse into arrays, mirroring the XML decoder.

use super::decoders::insert_grouped;
use super::types::BodyDecoder;
use crate::error::{Error, Result};
use crate::types::JsonObject;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Basic-format date-time, e.g. `20260115T093000Z`
static ICS_DATETIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8}T\d{6}Z?$").expect("valid regex"));

/// Basic-format date, e.g. `20260115`
static ICS_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").expect("valid regex"));

/// Decoder for iCalendar feeds
#[derive(Debug, Clone, Default)]
pub struct IcsDecoder;

impl IcsDecoder {
    /// Create a new iCalendar decoder
    pub fn new() -> Self {
        Self
    }
}

impl BodyDecoder for IcsDecoder {
    /// The items of a calendar feed are its `VEVENT` components
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let calendar = parse_calendar(body)?;
        match calendar.get("VEVENT") {
            Some(Value::Array(events)) => Ok(events.clone()),
            Some(event) => Ok(vec![event.clone()]),
            None => Ok(vec![]),
        }
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        Ok(Value::Object(parse_calendar(body)?))
    }
}

/// Parse a feed down to its `VCALENDAR` object
fn parse_calendar(body: &str) -> Result<JsonObject> {
    let mut stack: Vec<(String, JsonObject)> = Vec::new();
    let mut root: JsonObject = Map::new();

    for line in unfold(body) {
        if line.trim().is_empty() {
            continue;
        }
        // Content lines without a value separator are skipped, not fatal
        let Some((name, value)) = split_content_line(&line) else {
            continue;
        };

        match name.as_str() {
            "BEGIN" => stack.push((value.to_ascii_uppercase(), Map::new())),
            "END" => {
                let (component, props) = stack
                    .pop()
                    .ok_or_else(|| Error::ics(format!("END:{value} without matching BEGIN")))?;
                if component != value.to_ascii_uppercase() {
                    return Err(Error::ics(format!(
                        "mismatched END: expected {component}, found {value}"
                    )));
                }
                let target = stack.last_mut().map_or(&mut root, |(_, props)| props);
                insert_grouped(target, component, Value::Object(props));
            }
            _ => {
                let target = stack.last_mut().map_or(&mut root, |(_, props)| props);
                insert_grouped(target, name, property_value(&value));
            }
        }
    }

    if let Some((component, _)) = stack.last() {
        return Err(Error::ics(format!("missing END:{component}")));
    }

    // Strip the VCALENDAR wrapper when present
    match root.remove("VCALENDAR") {
        Some(Value::Object(calendar)) => Ok(calendar),
        Some(other) => {
            let mut map = Map::new();
            map.insert("VCALENDAR".to_string(), other);
            Ok(map)
        }
        None => Ok(root),
    }
}

/// Unfold continuation lines: a line starting with a space or tab extends
/// the previous one with its leading character removed.
fn unfold(body: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for raw in body.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some(last) = lines.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        lines.push(line.to_string());
    }

    lines
}

/// Split `NAME;PARAM="a:b":VALUE` at the first colon outside quotes.
///
/// Parameters are dropped; the property name is uppercased.
fn split_content_line(line: &str) -> Option<(String, String)> {
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => {
                let name = line[..i]
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_uppercase();
                if name.is_empty() {
                    return None;
                }
                return Some((name, line[i + 1..].to_string()));
            }
            _ => {}
        }
    }
    None
}

/// Convert a property value to JSON, unescaping text and normalizing
/// basic-format dates to ISO 8601.
fn property_value(raw: &str) -> Value {
    let text = unescape_text(raw);

    if ICS_DATETIME.is_match(&text) {
        let naive = &text[..15]; // yyyymmddThhmmss
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, "%Y%m%dT%H%M%S") {
            let formatted = if text.ends_with('Z') {
                format!("{}Z", dt.format("%Y-%m-%dT%H:%M:%S"))
            } else {
                dt.format("%Y-%m-%dT%H:%M:%S").to_string()
            };
            return Value::String(formatted);
        }
    } else if ICS_DATE.is_match(&text) {
        if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y%m%d") {
            return Value::String(date.format("%Y-%m-%d").to_string());
        }
    }

    Value::String(text)
}

/// Resolve RFC 5545 §3.3.11 text escapes
fn unescape_text(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped @ (',' | ';' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
