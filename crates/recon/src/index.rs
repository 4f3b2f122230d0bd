use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use serde_json::Value;

use crate::dataset::{array, entries};
use crate::model::Occupation;
use crate::normalize::normalize_title;

// ---------------------------------------------------------------------------
// DWA index
// ---------------------------------------------------------------------------

/// DWA text → canonical titles whose `dwas` list contains it.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DwaIndex(BTreeMap<String, BTreeSet<String>>);

impl DwaIndex {
    /// One scan over every entity's `dwas`.
    pub fn build<'a>(occupations: impl IntoIterator<Item = &'a Occupation>) -> Self {
        let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for occ in occupations {
            for dwa in &occ.dwas {
                map.entry(dwa.clone()).or_default().insert(occ.title.clone());
            }
        }
        Self(map)
    }

    pub fn get(&self, dwa: &str) -> Option<&BTreeSet<String>> {
        self.0.get(dwa)
    }

    /// Number of occupations associated with `dwa`; 0 when unknown.
    pub fn count(&self, dwa: &str) -> usize {
        self.0.get(dwa).map_or(0, BTreeSet::len)
    }

    /// Every DWA text, sorted.
    pub fn dwas(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Category index
// ---------------------------------------------------------------------------

/// The category dataset, in both directions.
#[derive(Debug, Default, Clone)]
pub struct CategoryIndex {
    /// normalized title → category names
    by_title: HashMap<String, BTreeSet<String>>,
    /// category name → raw titles as listed, blanks and non-strings dropped
    listed: BTreeMap<String, Vec<String>>,
}

impl CategoryIndex {
    pub fn build(categories: &Value) -> Self {
        let mut by_title: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut listed = BTreeMap::new();
        for (category, titles) in entries(categories) {
            let titles: Vec<String> = array(titles)
                .iter()
                .filter_map(Value::as_str)
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string)
                .collect();
            for raw in &titles {
                by_title
                    .entry(normalize_title(raw))
                    .or_default()
                    .insert(category.clone());
            }
            listed.insert(category.clone(), titles);
        }
        Self { by_title, listed }
    }

    /// Sorted category names for a normalized title.
    pub fn categories_for(&self, normalized: &str) -> Vec<String> {
        self.by_title
            .get(normalized)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Raw titles listed under `category`, in dataset order.
    pub fn titles_in(&self, category: &str) -> &[String] {
        self.listed.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Category names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.listed.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.listed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listed.is_empty()
    }
}
