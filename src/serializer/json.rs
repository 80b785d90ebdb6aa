//! JSON, JSONP and JavaScript variable formats.
//!
//! All three embed the same sorted, two-space indented JSON object so the
//! output diffs cleanly between runs.

use std::collections::BTreeMap;

use super::{MapCodec, MapFormat, Mapping, ParseError};

/// Sorted, indented JSON object.
fn to_json(mapping: &Mapping) -> String {
    let sorted: BTreeMap<&str, &str> = mapping.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    // Serializing string pairs cannot fail
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| "{}".to_string())
}

/// Slice between the first `open` and the last `close`.
fn between(content: &str, format: MapFormat, open: char, close: char) -> Result<&str, ParseError> {
    let start = content
        .find(open)
        .ok_or(ParseError::MissingDelimiter { format, delimiter: open })?;
    let end = content
        .rfind(close)
        .filter(|&end| end > start)
        .ok_or(ParseError::MissingDelimiter { format, delimiter: close })?;
    Ok(&content[start + open.len_utf8()..end])
}

pub struct JsonCodec;

impl MapCodec for JsonCodec {
    fn serialize(&self, mapping: &Mapping, _name: &str) -> String {
        to_json(mapping)
    }

    fn deserialize(&self, content: &str) -> Result<Mapping, ParseError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// `name(\n{...}\n);`
pub struct JsonpCodec;

impl MapCodec for JsonpCodec {
    fn serialize(&self, mapping: &Mapping, name: &str) -> String {
        format!("{name}(\n{}\n);", to_json(mapping))
    }

    fn deserialize(&self, content: &str) -> Result<Mapping, ParseError> {
        let body = between(content, MapFormat::Jsonp, '(', ')')?;
        Ok(serde_json::from_str(body)?)
    }
}

/// `var name = {...};`
pub struct JsCodec;

impl MapCodec for JsCodec {
    fn serialize(&self, mapping: &Mapping, name: &str) -> String {
        format!("var {name} = {};", to_json(mapping))
    }

    fn deserialize(&self, content: &str) -> Result<Mapping, ParseError> {
        let body = between(content, MapFormat::Js, '=', ';')?;
        Ok(serde_json::from_str(body)?)
    }
}
