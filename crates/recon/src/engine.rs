use std::collections::BTreeMap;

use crate::canonical::{collect_raw_titles, TitleIndex};
use crate::dataset::{entries, lookup, string_items, DatasetKind, Datasets};
use crate::flex::FlexList;
use crate::index::{CategoryIndex, DwaIndex};
use crate::model::{Bundle, BundleMeta, Occupation, Wages};
use crate::wages::{pick_summary, WageIndex};

/// Reconcile one dataset snapshot into a bundle.
///
/// Pure and infallible: malformed datasets and payloads degrade to empty
/// values. Deterministic for a fixed snapshot.
pub fn load(datasets: &Datasets) -> Bundle {
    for kind in DatasetKind::ALL {
        let value = datasets.get(kind);
        if !value.is_object() {
            log::debug!("dataset '{kind}' is not an object ({}); treating as empty", type_name(value));
        }
    }

    let raw_titles = collect_raw_titles(datasets);
    let title_index = TitleIndex::build(&raw_titles);
    let canonical = title_index.resolve_all(datasets);
    let category_index = CategoryIndex::build(&datasets.categories);
    let wage_index = WageIndex::build(&datasets.wages);

    let mut occupations = BTreeMap::new();
    for (normalized, title) in &canonical {
        let occupation = assemble_occupation(
            title,
            normalized,
            datasets,
            &title_index,
            &category_index,
            &wage_index,
        );
        occupations.insert(title.clone(), occupation);
    }

    let dwa_index = DwaIndex::build(occupations.values());
    let titles: Vec<String> = occupations.keys().cloned().collect();
    let dwas: Vec<String> = dwa_index.dwas().map(str::to_string).collect();

    log::debug!(
        "{} raw titles folded into {} occupations ({} wage groups, {} categories)",
        raw_titles.len(),
        occupations.len(),
        wage_index.len(),
        category_index.len()
    );
    log::info!("loaded {} occupations, {} DWAs", occupations.len(), dwas.len());

    Bundle {
        meta: BundleMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            loaded_at: chrono::Utc::now().to_rfc3339(),
            dataset_entries: DatasetKind::ALL
                .iter()
                .map(|&k| (k, datasets.entry_count(k)))
                .collect(),
            raw_titles: raw_titles.len(),
        },
        occupations,
        dwa_index,
        titles,
        dwas,
        canonical,
        category_index,
    }
}

/// Build the entity for one canonical title.
///
/// Profile fields are read under the canonical spelling itself; categories
/// and wages are read by normalized title and so merge every spelling.
pub fn assemble_occupation(
    title: &str,
    normalized: &str,
    datasets: &Datasets,
    title_index: &TitleIndex,
    category_index: &CategoryIndex,
    wage_index: &WageIndex,
) -> Occupation {
    let field = |kind: DatasetKind| lookup(datasets.get(kind), title);

    let description = field(DatasetKind::Descriptions)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let dwas = field(DatasetKind::Dwa).map(string_items).unwrap_or_default();

    let contexts: BTreeMap<String, Vec<String>> = field(DatasetKind::Contexts)
        .map(|v| {
            entries(v)
                .map(|(name, skills)| (name.clone(), string_items(skills)))
                .collect()
        })
        .unwrap_or_default();

    let tech_skills = field(DatasetKind::TechSkills)
        .map(FlexList::from_value)
        .unwrap_or_default();
    let tasks = field(DatasetKind::Tasks).map(FlexList::from_value).unwrap_or_default();

    let records = wage_index.records(normalized).to_vec();
    let summary = pick_summary(&records).cloned();

    let has_profile = title_index.variants(normalized).is_some_and(|spellings| {
        spellings.iter().any(|s| {
            DatasetKind::PROFILE
                .iter()
                .any(|&kind| datasets.has_key(kind, s))
        })
    });

    Occupation {
        title: title.to_string(),
        description,
        dwas,
        contexts,
        tech_skills,
        tasks,
        categories: category_index.categories_for(normalized),
        wages: Wages { records, summary },
        has_profile,
    }
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
