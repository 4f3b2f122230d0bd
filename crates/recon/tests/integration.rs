use std::collections::BTreeSet;
use std::path::PathBuf;

use serde_json::json;

use jobwallet_recon::canonical::collect_raw_titles;
use jobwallet_recon::config::FileNames;
use jobwallet_recon::views::{category_summaries, occupations_in, profile, CategorySummary};
use jobwallet_recon::wallet::{ImportOutcome, MemoryStore, Wallet};
use jobwallet_recon::{
    fetch_all, load, load_from, load_ids, normalize_title, pick_summary, Bundle, DatasetKind,
    Datasets, DirSource, ReconError,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/snapshot")
}

fn snapshot() -> Datasets {
    fetch_all(&DirSource::new(fixtures_dir(), FileNames::default())).unwrap()
}

fn load_snapshot() -> Bundle {
    load_from(&DirSource::new(fixtures_dir(), FileNames::default())).unwrap()
}

// -------------------------------------------------------------------------
// Entity set
// -------------------------------------------------------------------------

#[test]
fn every_spelling_folds_into_one_entity() {
    let bundle = load_snapshot();
    assert_eq!(
        bundle.titles,
        vec![
            "Barbers",
            "Cooks Short Order",
            "First-Line Supervisors of Food Preparation & Serving Workers",
            "Nurse Midwives",
            "Registered Nurses",
            "Software Developers",
        ]
    );

    for spelling in [
        "Cooks, Short Order",
        "cooks, short order",
        "COOKS SHORT ORDER",
        "cooks short order",
    ] {
        let occ = bundle.resolve(spelling).unwrap();
        assert!(std::ptr::eq(occ, bundle.get("Cooks Short Order").unwrap()));
    }
}

#[test]
fn every_raw_title_resolves_and_canonical_is_an_observed_spelling() {
    let datasets = snapshot();
    let bundle = load(&datasets);
    let raw = collect_raw_titles(&datasets);

    for title in &raw {
        let occ = bundle.resolve(title).unwrap_or_else(|| panic!("{title} did not resolve"));
        assert_eq!(normalize_title(&occ.title), normalize_title(title));
    }
    for occ in bundle.occupations.values() {
        assert!(raw.contains(&occ.title));
    }
}

#[test]
fn profile_fields_read_under_canonical_spelling_only() {
    let bundle = load_snapshot();
    let cooks = bundle.get("Cooks Short Order").unwrap();
    assert_eq!(cooks.dwas, vec!["Take orders"]);
    assert!(cooks.contexts.is_empty());
    assert_eq!(
        cooks.description.as_deref(),
        Some("Prepare a limited selection of quickly made dishes.")
    );
    assert!(cooks.has_profile);
}

#[test]
fn categories_and_wages_merge_across_spellings() {
    let bundle = load_snapshot();
    let cooks = bundle.get("Cooks Short Order").unwrap();
    assert_eq!(cooks.categories, vec!["Food Preparation & Serving", "Hospitality"]);
    assert_eq!(cooks.wages.records.len(), 2);
    let summary = cooks.wages.summary.as_ref().unwrap();
    assert_eq!(summary.text("AREA"), "US");
    assert_eq!(summary.text("H_MEDIAN"), "15.10");
}

#[test]
fn registered_nurses_profile() {
    let bundle = load_snapshot();
    let rn = bundle.get("Registered Nurses").unwrap();
    assert_eq!(
        rn.dwas,
        vec!["Assess patient health", "Administer medications", "Assess patient health"]
    );
    assert_eq!(rn.categories, vec!["Healthcare"]);

    let p = profile(rn);
    assert_eq!(p.skills, vec!["Active Listening", "Empathy", "Stamina"]);
    assert_eq!(p.tech_skills, vec!["Cerner", "Epic Systems", "Microsoft Excel"]);
    assert_eq!(p.tasks, vec!["Monitor patients", "Record vital signs"]);
    assert_eq!(p.annual_mean, "$89,010.00");
    assert_eq!(p.hourly_mean, "$42.80");
}

#[test]
fn malformed_payloads_degrade() {
    let bundle = load_snapshot();
    let dev = bundle.get("Software Developers").unwrap();
    assert!(dev.description.is_none());
    assert!(dev.contexts.is_empty());
    assert!(dev.wages.records.is_empty());
    assert!(dev.wages.summary.is_none());
    assert_eq!(dev.tech_skills.distinct_sorted(), vec!["Git", "Rust"]);
    assert_eq!(dev.tasks.items(), vec!["Design software", "Test programs", "Document code"]);
}

#[test]
fn category_only_titles_exist_without_profile() {
    let bundle = load_snapshot();
    let midwives = bundle.get("Nurse Midwives").unwrap();
    assert!(!midwives.has_profile);
    assert_eq!(midwives.categories, vec!["Healthcare"]);

    let barbers = bundle.get("Barbers").unwrap();
    assert!(!barbers.has_profile);
    assert_eq!(barbers.wages.summary.as_ref().unwrap().text("A_MEAN"), "*");
}

// -------------------------------------------------------------------------
// Indices
// -------------------------------------------------------------------------

#[test]
fn dwa_index_matches_entity_lists() {
    let bundle = load_snapshot();
    assert_eq!(
        bundle.dwas,
        vec![
            "Administer medications",
            "Assess patient health",
            "Clean work areas",
            "Supervise staff",
            "Take orders",
            "Write code",
        ]
    );

    for dwa in &bundle.dwas {
        let indexed = bundle.dwa_index.get(dwa).unwrap();
        let scanned: BTreeSet<String> = bundle
            .occupations
            .values()
            .filter(|o| o.dwas.contains(dwa))
            .map(|o| o.title.clone())
            .collect();
        assert_eq!(indexed, &scanned, "{dwa}");
    }
    for occ in bundle.occupations.values() {
        for dwa in &occ.dwas {
            assert!(bundle.dwa_index.get(dwa).unwrap().contains(&occ.title));
        }
    }
    assert!(bundle.dwa_index.get("Prepare food").is_none());
}

#[test]
fn explorer_counts() {
    let bundle = load_snapshot();
    let cats = category_summaries(&bundle);
    let c = |name: &str, count, known| CategorySummary { name: name.into(), count, known };
    assert_eq!(
        cats,
        vec![
            c("Computer & Mathematical", 1, 1),
            c("Food Preparation & Serving", 2, 2),
            c("Healthcare", 2, 1),
            c("Hospitality", 1, 1),
            c("Personal Care", 2, 0),
        ]
    );

    let listing = occupations_in(&bundle, "Personal Care", None);
    assert_eq!(listing.total, 2);
    assert_eq!(listing.rows[0].annual_mean, "*");
}

// -------------------------------------------------------------------------
// Determinism
// -------------------------------------------------------------------------

#[test]
fn repeated_loads_are_structurally_equal() {
    let a = load_snapshot();
    let b = load_snapshot();
    assert_eq!(a.occupations, b.occupations);
    assert_eq!(a.dwa_index, b.dwa_index);
    assert_eq!(a.titles, b.titles);
    assert_eq!(a.dwas, b.dwas);
}

// -------------------------------------------------------------------------
// End-to-end scenarios
// -------------------------------------------------------------------------

#[test]
fn nurse_scenario() {
    let datasets = Datasets::default()
        .with(DatasetKind::Dwa, json!({"Nurse": ["Assess patients"]}))
        .with(DatasetKind::Descriptions, json!({"Nurse": "Cares for patients."}))
        .with(DatasetKind::Categories, json!({"Healthcare": ["Nurse"]}))
        .with(DatasetKind::Wages, json!({"Nurse": [{"A_MEAN": "70000"}]}));
    let bundle = load(&datasets);

    assert_eq!(bundle.occupations.len(), 1);
    let nurse = bundle.get("Nurse").unwrap();
    assert_eq!(nurse.categories, vec!["Healthcare"]);
    assert_eq!(nurse.wages.summary.as_ref().unwrap().text("A_MEAN"), "70000");
    let expected: BTreeSet<String> = ["Nurse".to_string()].into();
    assert_eq!(bundle.dwa_index.get("Assess patients"), Some(&expected));

    let again = load(&datasets);
    assert_eq!(bundle.occupations, again.occupations);
}

#[test]
fn summary_scenarios() {
    let records: Vec<_> = [json!({"A_MEAN": null}), json!({"H_MEAN": 50})]
        .iter()
        .filter_map(jobwallet_recon::wages::WageRecord::from_value)
        .collect();
    assert_eq!(pick_summary(&records), Some(&records[1]));
    assert_eq!(pick_summary(&[]), None);
}

#[test]
fn wallet_against_loaded_index() {
    let bundle = load_snapshot();
    let mut store = MemoryStore::default();

    let mut wallet = Wallet::load(&store);
    assert_eq!(wallet.import("Clean work areas"), ImportOutcome::Imported);
    assert_eq!(wallet.import("Write code"), ImportOutcome::Imported);
    assert_eq!(wallet.import("Clean work areas"), ImportOutcome::AlreadyImported);
    wallet.save(&mut store).unwrap();

    let reloaded = Wallet::load(&store);
    assert_eq!(reloaded.items(), ["Write code", "Clean work areas"]);
    assert_eq!(reloaded.count("Clean work areas", &bundle.dwa_index), 1);
    assert_eq!(
        reloaded.count("Write code", &bundle.dwa_index),
        bundle.dwa_index.get("Write code").map_or(0, |s| s.len())
    );
}

#[test]
fn missing_file_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    for kind in DatasetKind::ALL {
        let src = fixtures_dir().join(kind.default_file_name());
        std::fs::copy(&src, dir.path().join(kind.default_file_name())).unwrap();
    }
    std::fs::write(dir.path().join(DatasetKind::Wages.default_file_name()), "{\"x\": [").unwrap();

    let err = load_from(&DirSource::new(dir.path(), FileNames::default())).unwrap_err();
    assert!(matches!(err, ReconError::DatasetParse { dataset: DatasetKind::Wages, .. }));
}

// -------------------------------------------------------------------------
// ID cards
// -------------------------------------------------------------------------

#[test]
fn id_cards_from_the_snapshot() {
    let src = DirSource::new(fixtures_dir(), FileNames::default());
    let cards = load_ids(&src, FileNames::default().ids_name()).unwrap();
    assert_eq!(cards.len(), 2);

    let ids: Vec<_> = cards.iter().map(|c| c.id()).collect();
    assert_eq!(ids, ["stu-001", "42"]);

    let student = cards[0].detail();
    assert_eq!(student.title, "Student ID");
    assert_eq!(student.issued_on, "Aug 15, 2024");
    let labels: Vec<_> = student.details.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Student Number", "Program Of Study", "Year", "Expires"]);

    let driver = cards[1].detail();
    assert_eq!(driver.subtitle, "WA");
    assert_eq!(driver.issued_on, "not a date");
    assert!(driver.details.is_empty());
}
