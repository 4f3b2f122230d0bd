//! Read-only projections of a [`Bundle`] for display.
//!
//! Each view is plain serializable data; rendering is the caller's job.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::{Bundle, Occupation};
use crate::wages::{format_usd, is_truthy, ANNUAL_MEAN, HOURLY_MEAN};

pub const NO_DESCRIPTION: &str = "No description available.";

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    /// Titles listed under the category.
    pub count: usize,
    /// Listed titles whose occupation has a loaded profile.
    pub known: usize,
}

/// Every category, sorted by name.
pub fn category_summaries(bundle: &Bundle) -> Vec<CategorySummary> {
    bundle
        .category_index
        .names()
        .map(|name| {
            let titles = bundle.category_index.titles_in(name);
            let known = titles
                .iter()
                .filter(|t| bundle.resolve(t).is_some_and(|o| o.has_profile))
                .count();
            CategorySummary {
                name: name.to_string(),
                count: titles.len(),
                known,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Occupations in a category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupationRow {
    /// Title as listed in the category.
    pub title: String,
    pub canonical_title: Option<String>,
    pub has_profile: bool,
    /// Formatted, empty when the summary has no annual mean.
    pub annual_mean: String,
    /// Formatted, empty when the summary has no hourly mean.
    pub hourly_mean: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupationListing {
    pub category: String,
    pub rows: Vec<OccupationRow>,
    pub shown: usize,
    pub total: usize,
}

/// Titles listed under `category`, sorted, narrowed by a case-insensitive
/// substring filter. An unknown category yields an empty listing.
pub fn occupations_in(bundle: &Bundle, category: &str, filter: Option<&str>) -> OccupationListing {
    let mut titles: Vec<&String> = bundle.category_index.titles_in(category).iter().collect();
    titles.sort();

    let rows: Vec<OccupationRow> = titles
        .iter()
        .filter(|t| matches_filter(t, filter))
        .map(|t| {
            let occ = bundle.resolve(t);
            let (annual_mean, hourly_mean) = occ
                .and_then(|o| o.wages.summary.as_ref())
                .map(|s| {
                    let fmt = |field: &str| {
                        s.get(field)
                            .filter(|v| is_truthy(v))
                            .map(|_| format_usd(&s.text(field)))
                            .unwrap_or_default()
                    };
                    (fmt(ANNUAL_MEAN), fmt(HOURLY_MEAN))
                })
                .unwrap_or_default();
            OccupationRow {
                title: t.to_string(),
                canonical_title: occ.map(|o| o.title.clone()),
                has_profile: occ.is_some_and(|o| o.has_profile),
                annual_mean,
                hourly_mean,
            }
        })
        .collect();

    OccupationListing {
        category: category.to_string(),
        shown: rows.len(),
        total: titles.len(),
        rows,
    }
}

/// Case-insensitive substring match; a blank filter matches everything.
pub fn matches_filter(text: &str, filter: Option<&str>) -> bool {
    match filter.map(|f| f.trim().to_lowercase()) {
        Some(q) if !q.is_empty() => text.to_lowercase().contains(&q),
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Occupation profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupationProfile {
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub annual_mean: String,
    pub hourly_mean: String,
    pub wage_records: usize,
    pub skills: Vec<String>,
    pub tasks: Vec<String>,
    pub tech_skills: Vec<String>,
    pub dwas: Vec<String>,
}

pub fn profile(occ: &Occupation) -> OccupationProfile {
    let description = occ
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    let (annual_mean, hourly_mean) = occ
        .wages
        .summary
        .as_ref()
        .map(|s| (format_usd(&s.text(ANNUAL_MEAN)), format_usd(&s.text(HOURLY_MEAN))))
        .unwrap_or_default();

    OccupationProfile {
        title: occ.title.clone(),
        description,
        categories: occ.categories.clone(),
        annual_mean,
        hourly_mean,
        wage_records: occ.wages.records.len(),
        skills: all_skills(&occ.contexts),
        tasks: occ.tasks.items().into_iter().map(str::to_string).collect(),
        tech_skills: occ.tech_skills.distinct_sorted(),
        dwas: occ.dwas.clone(),
    }
}

/// Union of every context's skills: trimmed, blanks and "nan" placeholders
/// dropped, distinct, sorted.
pub fn all_skills(contexts: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    contexts
        .values()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Requirement tree
// ---------------------------------------------------------------------------

/// Three branches hanging off one occupation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementTree {
    pub title: String,
    pub dwas: Vec<String>,
    pub skills: Vec<String>,
    pub tech_skills: Vec<String>,
}

impl RequirementTree {
    pub fn len(&self) -> usize {
        self.dwas.len() + self.skills.len() + self.tech_skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn requirement_tree(occ: &Occupation) -> RequirementTree {
    RequirementTree {
        title: occ.title.clone(),
        dwas: dedupe_sort(occ.dwas.iter().map(String::as_str)),
        skills: all_skills(&occ.contexts),
        tech_skills: occ.tech_skills.distinct_sorted(),
    }
}

fn dedupe_sort<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// DWAs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DwaSummary {
    pub dwa: String,
    pub occupations: usize,
}

/// Every DWA, sorted, with its occupation count.
pub fn dwa_summaries(bundle: &Bundle, filter: Option<&str>) -> Vec<DwaSummary> {
    bundle
        .dwas
        .iter()
        .filter(|d| matches_filter(d, filter))
        .map(|d| DwaSummary {
            dwa: d.clone(),
            occupations: bundle.dwa_index.count(d),
        })
        .collect()
}
