//! Incoming notification record
//!
//! Emitting applications encode the same logical field differently (int,
//! long, double or string), so every value is carried as a tagged
//! [`FieldValue`] and interpreted later by the coercion functions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One field value as received from an emitting application
///
/// Deserialization from JSON picks the narrowest matching variant: integers
/// that fit in 32 bits become `Int`, wider ones `Long`, fractional numbers
/// `Double`. Anything without a scalar interpretation lands in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Key present with no value
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Str(String),
    /// Lists, nested maps and other encodings this layer does not interpret
    Other(serde_json::Value),
}

impl FieldValue {
    /// Short name of the encoding, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Long(_) => "long",
            FieldValue::Double(_) => "double",
            FieldValue::Str(_) => "string",
            FieldValue::Other(_) => "other",
        }
    }

    /// String content, `None` for every non-string encoding
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Long(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Double(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

/// Field name -> value mapping for one playback notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// True if the key is present, whatever its value (including null)
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_numbers_pick_narrowest_variant() {
        let record: Record = serde_json::from_str(
            r#"{"small": 262, "wide": 5000000000, "frac": 262.9, "text": "262"}"#,
        )
        .unwrap();

        assert_eq!(record.get("small"), Some(&FieldValue::Int(262)));
        assert_eq!(record.get("wide"), Some(&FieldValue::Long(5_000_000_000)));
        assert_eq!(record.get("frac"), Some(&FieldValue::Double(262.9)));
        assert_eq!(record.get("text"), Some(&FieldValue::Str("262".into())));
    }

    #[test]
    fn test_json_null_bool_and_nested() {
        let record: Record =
            serde_json::from_str(r#"{"mbid": null, "flag": true, "list": [1, 2]}"#).unwrap();

        assert_eq!(record.get("mbid"), Some(&FieldValue::Null));
        assert!(record.contains_key("mbid"));
        assert_eq!(record.get("flag"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.get("list").map(FieldValue::kind), Some("other"));
    }

    #[test]
    fn test_builder_and_from_iter_agree() {
        let built = Record::new().with("artist", "Radiohead").with("state", 1);
        let collected: Record = vec![
            ("artist", FieldValue::from("Radiohead")),
            ("state", FieldValue::from(1)),
        ]
        .into_iter()
        .collect();

        assert_eq!(built, collected);
        assert_eq!(built.len(), 2);
    }

    #[test]
    fn test_as_str_only_for_strings() {
        assert_eq!(FieldValue::from("x").as_str(), Some("x"));
        assert_eq!(FieldValue::Int(1).as_str(), None);
        assert_eq!(FieldValue::Null.as_str(), None);
    }
}
