use std::fmt;

use serde_json::{Map, Value};

use crate::errors::{MalformedPayload, Result};

/// A parsed JSON object with forgiving typed accessors.
///
/// Store payloads are loosely typed: the same field may arrive as a number
/// on one store and as a string on another, or be missing entirely. The
/// getters here never fail. A missing key, a `null`, or a value that cannot
/// be coerced to the requested type yields the declared default (empty
/// string, zero), and the `find_*` variants report the miss as `None`.
///
/// Key order is preserved from the parsed text, but carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object. Empty or whitespace-only text yields an empty
    /// document.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        match serde_json::from_str(text) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(MalformedPayload::with_debug(
                "expected a JSON object",
                &value_kind(&other),
            )),
            Err(e) => Err(MalformedPayload::with_debug(
                "failed to parse JSON payload",
                &e,
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    // Lookups reporting a miss.
    // ----------------------------

    /// Strings are returned as-is; numbers and booleans are rendered as
    /// text; nested objects and arrays are returned as serialized JSON.
    pub fn find_string(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            nested @ (Value::Object(_) | Value::Array(_)) => Some(nested.to_string()),
            Value::Null => None,
        }
    }

    pub fn find_long(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(_) | Value::Object(_) | Value::Array(_) | Value::Null => None,
        }
    }

    pub fn find_int(&self, key: &str) -> Option<i32> {
        self.find_long(key).and_then(|v| i32::try_from(v).ok())
    }

    pub fn find_float(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Value::Bool(_) | Value::Object(_) | Value::Array(_) | Value::Null => None,
        }
    }

    pub fn find_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(_) | Value::Object(_) | Value::Array(_) | Value::Null => None,
        }
    }

    /// A nested object, or a string field that itself holds JSON object text
    /// (as Google Play does with the listing `json` field).
    pub fn find_document(&self, key: &str) -> Option<Document> {
        match self.0.get(key)? {
            Value::Object(map) => Some(Self(map.clone())),
            Value::String(s) => Self::parse(s).ok(),
            _ => None,
        }
    }

    // Lookups with defaults.
    // ----------------------------

    pub fn get_string(&self, key: &str) -> String {
        self.find_string(key).unwrap_or_default()
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.find_string(key).unwrap_or_else(|| default.to_owned())
    }

    pub fn get_int(&self, key: &str) -> i32 {
        self.get_int_or(key, 0)
    }

    pub fn get_int_or(&self, key: &str, default: i32) -> i32 {
        self.find_int(key).unwrap_or(default)
    }

    pub fn get_long(&self, key: &str) -> i64 {
        self.get_long_or(key, 0)
    }

    pub fn get_long_or(&self, key: &str, default: i64) -> i64 {
        self.find_long(key).unwrap_or(default)
    }

    pub fn get_float(&self, key: &str) -> f64 {
        self.get_float_or(key, 0.0)
    }

    pub fn get_float_or(&self, key: &str, default: f64) -> f64 {
        self.find_float(key).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.find_bool(key).unwrap_or(false)
    }

    pub fn get_document(&self, key: &str) -> Document {
        self.find_document(key).unwrap_or_default()
    }

    // Building.
    // ----------------------------

    /// Inserts or replaces `key`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn integral_f64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::IapNormalizerError;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => Document::from(map),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn blank_text_parses_to_empty_document() {
        for text in ["", "   ", "\n\t  \r\n"] {
            let parsed = Document::parse(text).unwrap();
            assert!(parsed.is_empty());
        }
    }

    #[test]
    fn invalid_text_is_malformed_payload() {
        let err = Document::parse("{\"sku\": ").unwrap_err();
        assert!(matches!(err, IapNormalizerError::MalformedPayload { .. }));
    }

    #[test]
    fn non_object_is_malformed_payload() {
        let err = Document::parse("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, IapNormalizerError::MalformedPayload { .. }));
        assert_eq!(err.debug(), Some("\"array\""));
    }

    #[test]
    fn missing_keys_yield_defaults() {
        let d = Document::new();
        assert_eq!(d.get_string("nope"), "");
        assert_eq!(d.get_int("nope"), 0);
        assert_eq!(d.get_long("nope"), 0);
        assert_eq!(d.get_float("nope"), 0.0);
        assert!(!d.get_bool("nope"));
        assert!(d.get_document("nope").is_empty());
        assert_eq!(d.get_string_or("nope", "fallback"), "fallback");
        assert_eq!(d.get_int_or("nope", 7), 7);
    }

    #[test]
    fn wrong_types_yield_defaults() {
        let d = doc(json!({
            "text": "gold",
            "flag": true,
            "nested": {"a": 1},
            "nothing": null,
            "huge": 9_000_000_000i64,
        }));
        assert_eq!(d.get_int("text"), 0);
        assert_eq!(d.get_float("flag"), 0.0);
        assert_eq!(d.get_long("nested"), 0);
        assert_eq!(d.get_string("nothing"), "");
        // Out of i32 range, but still a valid long.
        assert_eq!(d.get_int("huge"), 0);
        assert_eq!(d.get_long("huge"), 9_000_000_000);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let d = doc(json!({
            "cycles": "7",
            "price": " 1.19 ",
            "time": "1700000000000",
            "whole": 3.0,
            "enabled": "true",
        }));
        assert_eq!(d.get_int("cycles"), 7);
        assert_eq!(d.get_float("price"), 1.19);
        assert_eq!(d.get_long("time"), 1_700_000_000_000);
        assert_eq!(d.get_int("whole"), 3);
        assert!(d.get_bool("enabled"));
    }

    #[test]
    fn scalars_render_as_strings() {
        let d = doc(json!({"n": 42, "f": 0.5, "b": false, "o": {"k": "v"}}));
        assert_eq!(d.get_string("n"), "42");
        assert_eq!(d.get_string("f"), "0.5");
        assert_eq!(d.get_string("b"), "false");
        assert_eq!(d.get_string("o"), "{\"k\":\"v\"}");
    }

    #[test]
    fn nested_document_from_object_or_text() {
        let d = doc(json!({
            "inline": {"productId": "gold"},
            "embedded": "{\"productId\":\"silver\"}",
            "garbage": "not json",
        }));
        assert_eq!(d.get_document("inline").get_string("productId"), "gold");
        assert_eq!(d.get_document("embedded").get_string("productId"), "silver");
        assert!(d.find_document("garbage").is_none());
    }

    #[test]
    fn serialize_preserves_all_pairs() {
        let text = r#"{"sku":"gold","purchaseTime":1700000000000,"price":2.5,"nested":{"a":[1,2]}}"#;
        let parsed = Document::parse(text).unwrap();
        let reparsed = Document::parse(&parsed.serialize()).unwrap();
        assert_eq!(parsed, reparsed);
        assert_eq!(reparsed.len(), 4);
    }

    #[test]
    fn set_then_serialize() {
        let mut d = Document::new();
        d.set("sku", "gold").set("purchaseState", 1).set("purchaseTime", 5i64);
        d.set("sku", "silver");
        let reparsed = Document::parse(&d.serialize()).unwrap();
        assert_eq!(reparsed.get_string("sku"), "silver");
        assert_eq!(reparsed.get_int("purchaseState"), 1);
        assert_eq!(reparsed.get_long("purchaseTime"), 5);
        assert_eq!(reparsed.len(), 3);
    }
}
