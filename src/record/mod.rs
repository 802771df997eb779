//! Result record types
//!
//! A result record is an opaque field map plus per-field match spans, as
//! returned by a search backend for one query.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Separator used when a list field is displayed as one line
pub const LIST_SEPARATOR: &str = ", ";

/// A matched substring of a field's display text
///
/// Offsets are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Character offset of the first matched character
    pub start: usize,
    /// Number of matched characters
    pub len: usize,
}

impl MatchSpan {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

impl From<(usize, usize)> for MatchSpan {
    fn from((start, len): (usize, usize)) -> Self {
        Self::new(start, len)
    }
}

/// A field value: a single string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Convert a JSON value into a field value
    ///
    /// Numbers and booleans keep their JSON text. `null` and nested objects
    /// have no display form and yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => Some(FieldValue::Text(n.to_string())),
            Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
            Value::Array(items) => Some(FieldValue::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// Text the field is displayed as; match spans address this text
    pub fn display_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(LIST_SEPARATOR),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// One search hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Field name to value
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    /// Field name to matched spans, in the order the backend reported them
    #[serde(default)]
    pub matches: BTreeMap<String, Vec<MatchSpan>>,
}

impl ResultRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a flat JSON object
    ///
    /// Keys starting with `_` are backend metadata and are skipped.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let fields = object
            .iter()
            .filter(|(key, _)| !key.starts_with('_'))
            .filter_map(|(key, value)| FieldValue::from_json(value).map(|v| (key.clone(), v)))
            .collect();
        Self {
            fields,
            matches: BTreeMap::new(),
        }
    }

    /// Set a field value
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach `(start, len)` match spans to a field
    pub fn with_matches(
        mut self,
        key: impl Into<String>,
        spans: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        self.matches
            .insert(key.into(), spans.into_iter().map(MatchSpan::from).collect());
        self
    }

    /// Replace the spans of a field
    pub fn set_spans(&mut self, key: impl Into<String>, spans: Vec<MatchSpan>) {
        self.matches.insert(key.into(), spans);
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Spans for a field; empty when the field had no match
    pub fn spans(&self, key: &str) -> &[MatchSpan] {
        self.matches.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The `objectID` field, when present
    pub fn object_id(&self) -> Option<String> {
        self.field("objectID").map(FieldValue::display_text)
    }
}

/// Ordered hits for one query, bounded by the page size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    records: Vec<ResultRecord>,
}

impl ResultSet {
    /// Create a result set holding at most `limit` records
    pub fn new(mut records: Vec<ResultRecord>, limit: usize) -> Self {
        records.truncate(limit);
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Drop records beyond `limit`
    pub fn truncated(mut self, limit: usize) -> Self {
        self.records.truncate(limit);
        self
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_from_json() {
        assert_eq!(
            FieldValue::from_json(&json!("acme.com")),
            Some(FieldValue::Text("acme.com".to_string()))
        );
        assert_eq!(
            FieldValue::from_json(&json!(42)),
            Some(FieldValue::Text("42".to_string()))
        );
        assert_eq!(
            FieldValue::from_json(&json!(["a", "b"])),
            Some(FieldValue::List(vec!["a".to_string(), "b".to_string()]))
        );
        assert!(FieldValue::from_json(&json!(null)).is_none());
        assert!(FieldValue::from_json(&json!({"nested": true})).is_none());
    }

    #[test]
    fn test_list_display_text() {
        let value = FieldValue::List(vec!["(555) 123-4567".to_string(), "555-987-6543".to_string()]);
        assert_eq!(value.display_text(), "(555) 123-4567, 555-987-6543");
    }

    #[test]
    fn test_record_from_object_skips_metadata() {
        let object = json!({
            "objectID": "acme.com",
            "domain": "acme.com",
            "_highlightResult": {"domain": {"value": "<em>acme</em>.com"}},
            "missing": null
        });
        let record = ResultRecord::from_object(object.as_object().unwrap());
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.object_id().as_deref(), Some("acme.com"));
        assert!(record.field("_highlightResult").is_none());
        assert!(record.field("missing").is_none());
    }

    #[test]
    fn test_spans_default_empty() {
        let record = ResultRecord::new()
            .with_field("domain", "example.com")
            .with_matches("domain", [(0, 7)]);
        assert_eq!(record.spans("domain"), &[MatchSpan::new(0, 7)]);
        assert!(record.spans("phone_numbers").is_empty());
    }

    #[test]
    fn test_result_set_respects_limit() {
        let records = (0..8)
            .map(|i| ResultRecord::new().with_field("domain", format!("site{}.com", i)))
            .collect();
        let set = ResultSet::new(records, 5);
        assert_eq!(set.len(), 5);
        assert_eq!(set.truncated(2).len(), 2);
    }

    #[test]
    fn test_record_serialization() {
        let record = ResultRecord::new()
            .with_field("domain", "example.com")
            .with_matches("domain", [(0, 7)]);
        let json = serde_json::to_string(&record).unwrap();
        let back: ResultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
