//! Shape-flexible list fields (technology skills, tasks).
//!
//! Source datasets deliver these as a plain array, an object of arrays, or
//! an object of scalars. They are decoded exactly once, at ingestion, by
//! [`FlexList::from_value`]; every consumer reads the decoded form.

use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::dataset::number_text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlexList {
    /// A flat list of entries.
    Flat(Vec<String>),
    /// Entries grouped under a heading (e.g. tech-skill category), headings
    /// in the order the dataset lists them.
    Grouped(Vec<(String, Vec<String>)>),
}

impl Default for FlexList {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

impl FlexList {
    /// Decode a raw payload. Never fails: unusable shapes decode to an empty list.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::Flat(items.iter().filter_map(scalar_text).collect()),
            Value::Object(groups) => Self::Grouped(
                groups
                    .iter()
                    .map(|(heading, v)| {
                        let entries = match v {
                            Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
                            other => scalar_text(other).into_iter().collect(),
                        };
                        (heading.clone(), entries)
                    })
                    .collect(),
            ),
            other => Self::Flat(scalar_text(other).into_iter().collect()),
        }
    }

    /// All entries flattened, in source order.
    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::Flat(items) => items.iter().map(String::as_str).collect(),
            Self::Grouped(groups) => groups
                .iter()
                .flat_map(|(_, entries)| entries)
                .map(String::as_str)
                .collect(),
        }
    }

    /// Distinct entries, sorted.
    pub fn distinct_sorted(&self) -> Vec<String> {
        self.items()
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Flat(items) => items.len(),
            Self::Grouped(groups) => groups.iter().map(|(_, entries)| entries.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serialized in the source shape: an array, or an object keyed by heading.
impl Serialize for FlexList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flat(items) => items.serialize(serializer),
            Self::Grouped(groups) => {
                let mut map = serializer.serialize_map(Some(groups.len()))?;
                for (heading, entries) in groups {
                    map.serialize_entry(heading, entries)?;
                }
                map.end()
            }
        }
    }
}

/// Text of a scalar entry, trimmed. Falsy and nested values yield nothing.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) if n.as_f64() != Some(0.0) => number_text(n),
        Value::Bool(true) => "true".to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_array() {
        let f = FlexList::from_value(&json!([" Excel ", "", null, "SQL", 0, 7]));
        assert_eq!(f, FlexList::Flat(vec!["Excel".into(), "SQL".into(), "7".into()]));
    }

    #[test]
    fn whole_floats_drop_the_fraction() {
        let f = FlexList::from_value(&json!([1.0, 2, 2.5]));
        assert_eq!(f.items(), vec!["1", "2", "2.5"]);
    }

    #[test]
    fn object_of_arrays_and_scalars() {
        let f = FlexList::from_value(&json!({
            "Spreadsheet": ["Excel", "Sheets"],
            "Database": "SQL",
            "Empty": null
        }));
        assert_eq!(f.items(), vec!["Excel", "Sheets", "SQL"]);
        assert_eq!(f.len(), 3);
        match &f {
            FlexList::Grouped(g) => assert_eq!(
                g,
                &vec![
                    ("Spreadsheet".to_string(), vec!["Excel".to_string(), "Sheets".to_string()]),
                    ("Database".to_string(), vec!["SQL".to_string()]),
                    ("Empty".to_string(), vec![]),
                ]
            ),
            other => panic!("expected grouped, got {other:?}"),
        }
    }

    #[test]
    fn groups_keep_dataset_order() {
        let raw: Value = serde_json::from_str(r#"{"z": ["first"], "a": ["second"]}"#).unwrap();
        let f = FlexList::from_value(&raw);
        assert_eq!(f.items(), vec!["first", "second"]);
    }

    #[test]
    fn lone_string_and_junk() {
        assert_eq!(FlexList::from_value(&json!("Answer phones")).items(), vec!["Answer phones"]);
        assert!(FlexList::from_value(&json!(null)).is_empty());
        assert!(FlexList::from_value(&json!(false)).is_empty());
    }

    #[test]
    fn distinct_sorted_dedupes() {
        let f = FlexList::from_value(&json!({"a": ["Zoom", "Excel"], "b": ["Excel"]}));
        assert_eq!(f.distinct_sorted(), vec!["Excel", "Zoom"]);
    }

    #[test]
    fn serializes_in_source_shape() {
        let flat = FlexList::from_value(&json!(["x"]));
        assert_eq!(serde_json::to_value(&flat).unwrap(), json!(["x"]));
        let raw: Value = serde_json::from_str(r#"{"k": ["x"], "b": "y"}"#).unwrap();
        let grouped = FlexList::from_value(&raw);
        assert_eq!(serde_json::to_string(&grouped).unwrap(), r#"{"k":["x"],"b":["y"]}"#);
    }
}
