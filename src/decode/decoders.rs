//! JSON and XML decoder implementations

use super::types::BodyDecoder;
use crate::error::{Error, Result};
use serde_json::{Map, Value};

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional item path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot-notation path to the items within the body
    item_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder that extracts items from a dot-notation path
    /// (e.g. `"data.items"`)
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            item_path: Some(path.into()),
        }
    }
}

impl BodyDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value: Value = serde_json::from_str(body)?;

        match &self.item_path {
            Some(path) => match lookup_path(&value, path) {
                Some(Value::Array(arr)) => Ok(arr),
                Some(v) => Ok(vec![v]),
                None => Ok(vec![]),
            },
            None => match value {
                // Top-level array is the common shape for list endpoints
                Value::Array(arr) => Ok(arr),
                v => Ok(vec![v]),
            },
        }
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Walk a dot-notation path through nested objects
fn lookup_path(value: &Value, path: &str) -> Option<Value> {
    let mut current = value;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current.clone())
}

// ============================================================================
// XML Decoder
// ============================================================================

/// XML decoder producing JSON objects.
///
/// Element attributes are ignored; repeated sibling elements collapse into
/// arrays. Suited to the flat record-oriented XML that list endpoints serve,
/// not to document-style markup.
#[derive(Debug, Clone, Default)]
pub struct XmlDecoder {
    /// Element name (dot-notation path within the root) containing items
    item_element: Option<String>,
}

impl XmlDecoder {
    /// Create a new XML decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an XML decoder that extracts items from a named element
    pub fn with_element(element: impl Into<String>) -> Self {
        Self {
            item_element: Some(element.into()),
        }
    }
}

impl BodyDecoder for XmlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let root = parse_document(body)?;

        match &self.item_element {
            Some(element) => match lookup_path(&root, element) {
                Some(Value::Array(arr)) => Ok(arr),
                Some(v) => Ok(vec![v]),
                None => Ok(vec![]),
            },
            None => match root {
                Value::Array(arr) => Ok(arr),
                v => Ok(vec![v]),
            },
        }
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        parse_document(body)
    }
}

/// Parse an XML document and return the root element's content
fn parse_document(xml: &str) -> Result<Value> {
    let rest = skip_prolog(xml.trim());
    if rest.is_empty() {
        return Err(Error::xml("empty document"));
    }
    let (_, value, trailing) = parse_element(rest)?;
    if !trailing.trim().is_empty() {
        return Err(Error::xml("trailing content after root element"));
    }
    Ok(value)
}

/// Skip the XML declaration, doctype and leading comments
fn skip_prolog(mut input: &str) -> &str {
    loop {
        input = input.trim_start();
        if input.starts_with("<?") {
            match input.find("?>") {
                Some(end) => input = &input[end + 2..],
                None => return input,
            }
        } else if input.starts_with("<!--") {
            match input.find("-->") {
                Some(end) => input = &input[end + 3..],
                None => return input,
            }
        } else if input.starts_with("<!") {
            match input.find('>') {
                Some(end) => input = &input[end + 1..],
                None => return input,
            }
        } else {
            return input;
        }
    }
}

/// Parse one element; returns its tag name, content value and the remainder
fn parse_element(input: &str) -> Result<(String, Value, &str)> {
    let input = input.trim_start();
    let after_open = input
        .strip_prefix('<')
        .ok_or_else(|| Error::xml("expected element"))?;

    let name_end = after_open
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .ok_or_else(|| Error::xml("unterminated tag"))?;
    let name = &after_open[..name_end];
    if name.is_empty() {
        return Err(Error::xml("empty tag name"));
    }

    let after_name = &after_open[name_end..];
    let tag_close = after_name
        .find('>')
        .ok_or_else(|| Error::xml(format!("unterminated tag: {name}")))?;

    // Attributes between the name and '>' are skipped
    if after_name[..tag_close].ends_with('/') {
        return Ok((name.to_string(), Value::Null, &after_name[tag_close + 1..]));
    }

    let mut rest = &after_name[tag_close + 1..];
    let mut children: Map<String, Value> = Map::new();
    let mut text = String::new();

    loop {
        rest = rest.trim_start();

        if let Some(after) = rest.strip_prefix("</") {
            let end = after
                .find('>')
                .ok_or_else(|| Error::xml("unterminated closing tag"))?;
            let close = after[..end].trim();
            if close != name {
                return Err(Error::xml(format!(
                    "mismatched closing tag: expected {name}, found {close}"
                )));
            }
            rest = &after[end + 1..];
            break;
        } else if rest.starts_with("<!--") {
            let end = rest
                .find("-->")
                .ok_or_else(|| Error::xml("unterminated comment"))?;
            rest = &rest[end + 3..];
        } else if rest.starts_with('<') {
            let (child_name, child_value, remainder) = parse_element(rest)?;
            insert_grouped(&mut children, child_name, child_value);
            rest = remainder;
        } else if rest.is_empty() {
            return Err(Error::xml(format!("missing closing tag for {name}")));
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            text.push_str(&rest[..end]);
            rest = &rest[end..];
        }
    }

    let value = if children.is_empty() {
        let text = unescape_entities(text.trim());
        if text.is_empty() {
            Value::Null
        } else {
            scalar_from_text(&text)
        }
    } else {
        // Mixed content: child elements win, surrounding text is dropped
        Value::Object(children)
    };

    Ok((name.to_string(), value, rest))
}

/// Insert a child value, collapsing repeated names into an array
pub(super) fn insert_grouped(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        Some(Value::Array(arr)) => arr.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(key, value);
        }
    }
}

/// Resolve the predefined XML entities
fn unescape_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Interpret text content as the narrowest JSON scalar
fn scalar_from_text(text: &str) -> Value {
    if let Ok(n) = text.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = text.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(n) {
            return Value::Number(num);
        }
    }
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(text.to_string()),
    }
}
