//! Cross-seed working parameters.
//!
//! # Design
//! - Parameters stay an open JSON object; the backend owns the schema per target site.
//! - Merges are shallow: nested objects in an update replace the stored value outright.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User-edited cross-seed configuration keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingParams(Map<String, Value>);

impl WorkingParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from a JSON value, accepting only objects.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Overwrite matching keys with those in `partial`; other keys are retained.
    pub fn merge(&mut self, partial: Self) {
        for (key, value) in partial.0 {
            self.0.insert(key, value);
        }
    }

    /// Set a single field.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Read a single field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Read a field as a string slice when it holds a JSON string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying JSON object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for WorkingParams {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl<'a> IntoIterator for &'a WorkingParams {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for WorkingParams {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Parse pasted text as a parameter object.
#[must_use]
pub fn parse_object(raw: &str) -> Option<WorkingParams> {
    serde_json::from_str(raw.trim()).ok().and_then(WorkingParams::from_value)
}

/// Editable text for a parameter value: strings as-is, everything else as JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}

/// Convert edited text back into a value shaped like `previous`.
///
/// String fields stay strings; other fields are parsed as JSON and fall back to
/// a string when the text is not valid JSON.
#[must_use]
pub fn coerce_input(raw: &str, previous: Option<&Value>) -> Value {
    match previous {
        Some(Value::String(_)) | None => Value::String(raw.to_string()),
        Some(_) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{WorkingParams, coerce_input, display_value, parse_object};
    use serde_json::json;

    #[test]
    fn merge_is_shallow() {
        let mut params = WorkingParams::from_value(json!({
            "title": "a",
            "mediainfo": {"codec": "x264", "bitrate": 1}
        }))
        .unwrap();
        params.merge(WorkingParams::from_value(json!({"mediainfo": {"codec": "x265"}})).unwrap());
        assert_eq!(params.get_str("title"), Some("a"));
        assert_eq!(params.get("mediainfo"), Some(&json!({"codec": "x265"})));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(WorkingParams::from_value(json!([1, 2])).is_none());
        assert!(WorkingParams::from_value(json!("x")).is_none());
    }

    #[test]
    fn pasted_text_must_be_an_object() {
        let params = parse_object(r#" {"title": "x", "year": 2020} "#).unwrap();
        assert_eq!(params.get_str("title"), Some("x"));
        assert!(parse_object("[1]").is_none());
        assert!(parse_object("not json").is_none());
    }

    #[test]
    fn edited_text_keeps_the_field_shape() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!([1, 2])), "[1,2]");
        assert_eq!(coerce_input("12", Some(&json!("old"))), json!("12"));
        assert_eq!(coerce_input("12", Some(&json!(3))), json!(12));
        assert_eq!(coerce_input("oops", Some(&json!(3))), json!("oops"));
        assert_eq!(coerce_input("new", None), json!("new"));
    }
}
