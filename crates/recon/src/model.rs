use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::dataset::DatasetKind;
use crate::flex::FlexList;
use crate::index::{CategoryIndex, DwaIndex};
use crate::normalize::normalize_title;
use crate::wages::WageRecord;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One reconciled occupation, keyed by its canonical title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occupation {
    pub title: String,
    pub description: Option<String>,
    /// Raw DWA list, falsy entries removed, duplicates kept.
    pub dwas: Vec<String>,
    pub contexts: BTreeMap<String, Vec<String>>,
    pub tech_skills: FlexList,
    pub tasks: FlexList,
    /// Sorted.
    pub categories: Vec<String>,
    pub wages: Wages,
    /// Any spelling of the title keys one of the profile datasets.
    pub has_profile: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Wages {
    pub records: Vec<WageRecord>,
    pub summary: Option<WageRecord>,
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct BundleMeta {
    pub engine_version: String,
    pub loaded_at: String,
    /// Top-level entry count of each input dataset.
    pub dataset_entries: BTreeMap<DatasetKind, usize>,
    pub raw_titles: usize,
}

/// The complete, immutable output of one load.
#[derive(Debug, Clone, Serialize)]
pub struct Bundle {
    pub meta: BundleMeta,
    /// Canonical title → entity.
    pub occupations: BTreeMap<String, Occupation>,
    pub dwa_index: DwaIndex,
    /// Canonical titles, sorted.
    pub titles: Vec<String>,
    /// DWA texts, sorted.
    pub dwas: Vec<String>,
    /// Normalized title → canonical title.
    #[serde(skip)]
    pub canonical: HashMap<String, String>,
    #[serde(skip)]
    pub category_index: CategoryIndex,
}

impl Bundle {
    /// Entity by canonical title.
    pub fn get(&self, canonical_title: &str) -> Option<&Occupation> {
        self.occupations.get(canonical_title)
    }

    /// Entity by any raw spelling.
    pub fn resolve(&self, raw_title: &str) -> Option<&Occupation> {
        self.canonical_title(raw_title).and_then(|c| self.get(c))
    }

    /// Canonical spelling for any raw spelling.
    pub fn canonical_title(&self, raw_title: &str) -> Option<&str> {
        self.canonical
            .get(&normalize_title(raw_title))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.occupations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupations.is_empty()
    }
}
