//! Canonical-title resolution.
//!
//! Every raw spelling observed anywhere is grouped under its normalized
//! form; each group elects one spelling as the canonical (display) title.

use std::collections::{BTreeSet, HashMap};

use crate::dataset::{array, entries, DatasetKind, Datasets};
use crate::normalize::normalize_title;

/// Every raw title in the snapshot: keys of the title-keyed datasets plus
/// every title listed under any category.
pub fn collect_raw_titles(datasets: &Datasets) -> BTreeSet<String> {
    let mut titles = BTreeSet::new();
    for kind in DatasetKind::TITLE_PREFERENCE {
        titles.extend(entries(datasets.get(kind)).map(|(k, _)| k.clone()));
    }
    for (_, listed) in entries(&datasets.categories) {
        titles.extend(array(listed).iter().filter_map(|t| t.as_str()).map(str::to_string));
    }
    titles
}

/// Normalized title → raw spellings, ordered.
#[derive(Debug, Default, Clone)]
pub struct TitleIndex {
    variants: HashMap<String, BTreeSet<String>>,
}

impl TitleIndex {
    pub fn build<'a>(raw_titles: impl IntoIterator<Item = &'a String>) -> Self {
        let mut variants: HashMap<String, BTreeSet<String>> = HashMap::new();
        for raw in raw_titles {
            variants.entry(normalize_title(raw)).or_default().insert(raw.clone());
        }
        Self { variants }
    }

    pub fn variants(&self, normalized: &str) -> Option<&BTreeSet<String>> {
        self.variants.get(normalized)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Elect the canonical spelling of every group.
    pub fn resolve_all(&self, datasets: &Datasets) -> HashMap<String, String> {
        self.variants
            .iter()
            .filter_map(|(norm, spellings)| {
                elect(spellings, datasets).map(|c| (norm.clone(), c.to_string()))
            })
            .collect()
    }
}

/// The first spelling (in byte order) that keys the most preferred dataset
/// carrying any of them; failing that, the smallest spelling overall.
pub fn elect<'a>(spellings: &'a BTreeSet<String>, datasets: &Datasets) -> Option<&'a str> {
    DatasetKind::TITLE_PREFERENCE
        .iter()
        .find_map(|&kind| spellings.iter().find(|s| datasets.has_key(kind, s)))
        .or_else(|| spellings.iter().next())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn collects_from_every_source() {
        let ds = Datasets::default()
            .with(DatasetKind::Dwa, json!({"A": []}))
            .with(DatasetKind::Wages, json!({"B": []}))
            .with(DatasetKind::Categories, json!({"Cat": ["C", 5, null], "Bad": "D"}));
        assert_eq!(collect_raw_titles(&ds), set(&["A", "B", "C"]));
    }

    #[test]
    fn dwa_spelling_beats_description_spelling() {
        let ds = Datasets::default()
            .with(DatasetKind::Descriptions, json!({"Cooks, Short Order": "x"}))
            .with(DatasetKind::Dwa, json!({"Cooks Short Order": ["Grill"]}));
        let spellings = set(&["Cooks, Short Order", "Cooks Short Order"]);
        assert_eq!(elect(&spellings, &ds), Some("Cooks Short Order"));
    }

    #[test]
    fn wages_beat_categories_only() {
        let ds = Datasets::default().with(DatasetKind::Wages, json!({"sales & related": []}));
        let spellings = set(&["Sales and Related", "sales & related"]);
        assert_eq!(elect(&spellings, &ds), Some("sales & related"));
    }

    #[test]
    fn fallback_is_lexicographically_smallest() {
        let ds = Datasets::default();
        let spellings = set(&["nurse", "Nurse", "NURSE"]);
        assert_eq!(elect(&spellings, &ds), Some("NURSE"));
    }

    #[test]
    fn same_level_tie_is_smallest() {
        let ds = Datasets::default().with(DatasetKind::Tasks, json!({"b/c": [], "B C": []}));
        let spellings = set(&["b/c", "B C"]);
        assert_eq!(elect(&spellings, &ds), Some("B C"));
    }

    #[test]
    fn groups_by_normalized_form() {
        let raw = set(&["Sales & Related", "sales and related", "Nurse"]);
        let idx = TitleIndex::build(&raw);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.variants("sales and related").map(|v| v.len()), Some(2));
        let canon = idx.resolve_all(&Datasets::default());
        assert_eq!(canon["sales and related"], "Sales & Related");
        assert_eq!(canon["nurse"], "Nurse");
    }
}
