//! Dataset records: a speech's text plus its metadata
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::preprocess::Pipeline;

/// A scalar metadata value
///
/// Ordering is by variant first (booleans, then integers, then text), which keeps `min`/`max`
/// well-defined over mixed columns. ISO dates order correctly as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl MetaValue {
    /// Scalars map directly; other numbers and nested values keep their JSON text. Nulls are
    /// dropped.
    pub fn from_json(value: Value) -> Option<MetaValue> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(MetaValue::Bool(b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => MetaValue::Int(i),
                None => MetaValue::Text(n.to_string()),
            }),
            Value::String(s) => Some(MetaValue::Text(s)),
            other => Some(MetaValue::Text(other.to_string())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match *self {
            MetaValue::Text(ref s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            MetaValue::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MetaValue::Bool(b) => write!(f, "{}", b),
            MetaValue::Int(i) => write!(f, "{}", i),
            MetaValue::Text(ref s) => write!(f, "{}", s),
        }
    }
}

impl<'a> From<&'a str> for MetaValue {
    fn from(s: &'a str) -> Self {
        MetaValue::Text(s.to_string())
    }
}
impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        MetaValue::Int(i)
    }
}

pub type Metadata = BTreeMap<String, MetaValue>;

/// One speech
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub text: String,
    pub meta: Metadata,
}

impl Record {
    pub fn new<S: Into<String>>(text: S, meta: Metadata) -> Self {
        Record { text: text.into(), meta }
    }

    /// Split a JSON object into its `text` field and everything else as metadata.
    ///
    /// Returns `None` when there is no string `text` field.
    pub fn from_json(value: Value) -> Option<Record> {
        let mut object = match value {
            Value::Object(object) => object,
            _ => return None,
        };
        let text = match object.remove("text") {
            Some(Value::String(text)) => text,
            _ => return None,
        };
        let meta = object
            .into_iter()
            .filter_map(|(k, v)| MetaValue::from_json(v).map(|v| (k, v)))
            .collect();
        Some(Record { text, meta })
    }

    /// Run the text through a preprocessing pipeline.
    ///
    /// This consumes the record: the original text is gone afterwards, keep a copy (or re-read
    /// the dataset) if you need it.
    pub fn preprocess(self, pipeline: &Pipeline) -> Record {
        Record {
            text: pipeline.apply(&self.text),
            meta: self.meta,
        }
    }

    pub fn get(&self, field: &str) -> Option<&MetaValue> {
        self.meta.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_text_from_metadata() {
        let rec = Record::from_json(json!({
            "text": "Mr. Speaker, I rise today.",
            "date": "1999-03-02",
            "congress": 106,
            "speaker_name": "Bernie Sanders",
            "title": null,
        }))
        .unwrap();
        assert_eq!(rec.text, "Mr. Speaker, I rise today.");
        assert_eq!(rec.get("congress"), Some(&MetaValue::Int(106)));
        assert_eq!(rec.get("date").and_then(|v| v.as_str()), Some("1999-03-02"));
        assert!(rec.get("title").is_none());
        assert!(rec.get("text").is_none());
    }

    #[test]
    fn rejects_objects_without_text() {
        assert!(Record::from_json(json!({"date": "1999-03-02"})).is_none());
        assert!(Record::from_json(json!(["text"])).is_none());
    }

    #[test]
    fn iso_dates_order_as_text() {
        let early = MetaValue::from("1996-01-03");
        let late = MetaValue::from("2016-06-30");
        assert!(early < late);
    }
}
