//! The seven input datasets and the defensive accessors used to read them.
//!
//! Datasets are kept as raw `serde_json::Value`s. Nothing here rejects a
//! malformed document: a dataset that is not an object reads as an empty
//! object, a payload that is not an array reads as an empty array.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Identifies one of the input datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Dwa,
    Contexts,
    TechSkills,
    Tasks,
    Descriptions,
    Wages,
    Categories,
}

impl DatasetKind {
    /// All datasets, in fetch order.
    pub const ALL: [DatasetKind; 7] = [
        Self::Dwa,
        Self::Contexts,
        Self::TechSkills,
        Self::Tasks,
        Self::Descriptions,
        Self::Wages,
        Self::Categories,
    ];

    /// Title-keyed datasets in canonical-title preference order.
    pub const TITLE_PREFERENCE: [DatasetKind; 6] = [
        Self::Dwa,
        Self::Contexts,
        Self::TechSkills,
        Self::Tasks,
        Self::Descriptions,
        Self::Wages,
    ];

    /// Datasets whose presence means an occupation has a loaded profile.
    pub const PROFILE: [DatasetKind; 5] = [
        Self::Dwa,
        Self::Contexts,
        Self::TechSkills,
        Self::Tasks,
        Self::Descriptions,
    ];

    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Dwa => "jobs_dwa.json",
            Self::Contexts => "jobs_context_skills.json",
            Self::TechSkills => "jobs_tech_skills.json",
            Self::Tasks => "jobs_tasks.json",
            Self::Descriptions => "jobs_descriptions.json",
            Self::Wages => "wages_by_occupation.json",
            Self::Categories => "occupations_by_category.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dwa => "dwa",
            Self::Contexts => "contexts",
            Self::TechSkills => "tech_skills",
            Self::Tasks => "tasks",
            Self::Descriptions => "descriptions",
            Self::Wages => "wages",
            Self::Categories => "categories",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One complete snapshot of every input dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub dwa: Value,
    pub contexts: Value,
    pub tech_skills: Value,
    pub tasks: Value,
    pub descriptions: Value,
    pub wages: Value,
    pub categories: Value,
}

impl Datasets {
    pub fn get(&self, kind: DatasetKind) -> &Value {
        match kind {
            DatasetKind::Dwa => &self.dwa,
            DatasetKind::Contexts => &self.contexts,
            DatasetKind::TechSkills => &self.tech_skills,
            DatasetKind::Tasks => &self.tasks,
            DatasetKind::Descriptions => &self.descriptions,
            DatasetKind::Wages => &self.wages,
            DatasetKind::Categories => &self.categories,
        }
    }

    pub fn set(&mut self, kind: DatasetKind, value: Value) {
        let slot = match kind {
            DatasetKind::Dwa => &mut self.dwa,
            DatasetKind::Contexts => &mut self.contexts,
            DatasetKind::TechSkills => &mut self.tech_skills,
            DatasetKind::Tasks => &mut self.tasks,
            DatasetKind::Descriptions => &mut self.descriptions,
            DatasetKind::Wages => &mut self.wages,
            DatasetKind::Categories => &mut self.categories,
        };
        *slot = value;
    }

    /// Builder form of [`Datasets::set`].
    pub fn with(mut self, kind: DatasetKind, value: Value) -> Self {
        self.set(kind, value);
        self
    }

    /// True if `key` is a top-level key of the given dataset.
    pub fn has_key(&self, kind: DatasetKind, key: &str) -> bool {
        lookup(self.get(kind), key).is_some()
    }

    /// Number of top-level entries; 0 for a malformed dataset.
    pub fn entry_count(&self, kind: DatasetKind) -> usize {
        self.get(kind).as_object().map_or(0, |m| m.len())
    }
}

/// Key/value pairs of an object; nothing for any other value.
pub(crate) fn entries(value: &Value) -> impl Iterator<Item = (&String, &Value)> {
    value.as_object().into_iter().flat_map(|m| m.iter())
}

/// Member `key` of an object value.
pub(crate) fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|m| m.get(key))
}

/// Elements of an array; empty for any other value.
pub(crate) fn array(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Display text of a JSON number. Integral floats print without a
/// fraction (`1.0` → `1`), matching how the datasets' producers render them.
pub(crate) fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Non-empty string elements of an array, in order.
pub(crate) fn string_items(value: &Value) -> Vec<String> {
    array(value)
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
