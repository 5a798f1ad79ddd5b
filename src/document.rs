// Input documents — an id plus named text fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single search result to be clustered.
///
/// Serialized as a flat JSON object: `id` plus one key per text field,
/// e.g. `{"id": "7", "title": "...", "summary": "...", "url": "..."}`.
/// Non-string values are skipped when reading, so `"url": null` or a numeric
/// `rank` does not reject the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

/// Wire shape before non-text values are dropped.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    id: Value,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let id = match raw.id {
            Value::String(id) => id,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        let fields = raw
            .fields
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::String(text) => Some((name, text)),
                _ => None,
            })
            .collect();
        Self { id, fields }
    }
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style helper for setting a field.
    pub fn with_field(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields.insert(name.into(), text.into());
        self
    }

    /// Shorthand for the common title + summary shape of a search result.
    pub fn from_title_summary(
        id: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self::new(id)
            .with_field("title", title)
            .with_field("summary", summary)
    }

    /// Text of a field, if present. Missing fields are not an error.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_flat_json() {
        let doc: Document =
            serde_json::from_str(r#"{"id":"1","title":"Rust","summary":"Systems language"}"#)
                .unwrap();
        assert_eq!(doc.id, "1");
        assert_eq!(doc.field("title"), Some("Rust"));
        assert_eq!(doc.field("summary"), Some("Systems language"));
        assert_eq!(doc.field("url"), None);
    }

    #[test]
    fn missing_id_defaults_to_empty() {
        let doc: Document = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert!(doc.id.is_empty());
        assert_eq!(doc.fields.len(), 1);
    }

    #[test]
    fn non_text_values_are_skipped() {
        let doc: Document = serde_json::from_str(
            r#"{"id":"3","title":"Rust","url":null,"rank":4,"tags":["a"],"meta":{"k":"v"},"fresh":true}"#,
        )
        .unwrap();
        assert_eq!(doc.field("title"), Some("Rust"));
        assert_eq!(doc.fields.len(), 1);
    }

    #[test]
    fn numeric_id_is_kept_as_text() {
        let docs: Vec<Document> =
            serde_json::from_str(r#"[{"id":17,"title":"a"},{"id":null,"title":"b"}]"#).unwrap();
        assert_eq!(docs[0].id, "17");
        assert!(docs[1].id.is_empty());
    }
}
