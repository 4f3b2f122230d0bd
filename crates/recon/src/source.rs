//! Fetching the raw dataset documents.
//!
//! A load issues every fetch at once and waits for all of them. Any single
//! fetch or JSON parse failure fails the whole load; there is no partial
//! snapshot.

use std::path::PathBuf;
use std::thread;

use serde_json::Value;

use crate::config::FileNames;
use crate::dataset::{DatasetKind, Datasets};
use crate::engine;
use crate::error::ReconError;
use crate::ids::{parse_ids, IdCard};
use crate::model::Bundle;

/// Anything that can hand back the raw text of a dataset.
pub trait DatasetSource: Sync {
    fn fetch(&self, kind: DatasetKind) -> Result<String, ReconError>;

    /// Raw text of a side document stored next to the datasets.
    fn fetch_file(&self, name: &str) -> Result<String, ReconError>;

    /// Human-readable location, for messages.
    fn describe(&self) -> String;
}

/// Datasets as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
    files: FileNames,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>, files: FileNames) -> Self {
        Self { dir: dir.into(), files }
    }

    pub fn path(&self, kind: DatasetKind) -> PathBuf {
        self.dir.join(self.files.name(kind))
    }
}

impl DatasetSource for DirSource {
    fn fetch(&self, kind: DatasetKind) -> Result<String, ReconError> {
        let path = self.path(kind);
        std::fs::read_to_string(&path).map_err(|e| ReconError::DatasetFetch {
            dataset: kind,
            message: format!("{}: {e}", path.display()),
        })
    }

    fn fetch_file(&self, name: &str) -> Result<String, ReconError> {
        let path = self.dir.join(name);
        std::fs::read_to_string(&path).map_err(|e| ReconError::DocumentFetch {
            name: name.to_string(),
            message: format!("{}: {e}", path.display()),
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Fetch and parse every dataset concurrently, one thread each.
///
/// Valid JSON of any shape is accepted here (the engine coerces it);
/// unreadable or unparseable documents fail the load. When several fail,
/// the first in [`DatasetKind::ALL`] order is reported.
pub fn fetch_all<S: DatasetSource + ?Sized>(source: &S) -> Result<Datasets, ReconError> {
    log::debug!("fetching {} datasets from {}", DatasetKind::ALL.len(), source.describe());

    let results: Vec<(DatasetKind, Result<Value, ReconError>)> = thread::scope(|scope| {
        let handles: Vec<_> = DatasetKind::ALL
            .iter()
            .map(|&kind| (kind, scope.spawn(move || fetch_one(source, kind))))
            .collect();

        handles
            .into_iter()
            .map(|(kind, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(ReconError::DatasetFetch {
                        dataset: kind,
                        message: "fetch worker panicked".into(),
                    })
                });
                (kind, result)
            })
            .collect()
    });

    let mut datasets = Datasets::default();
    for (kind, result) in results {
        datasets.set(kind, result?);
    }
    Ok(datasets)
}

fn fetch_one<S: DatasetSource + ?Sized>(source: &S, kind: DatasetKind) -> Result<Value, ReconError> {
    let text = source.fetch(kind)?;
    serde_json::from_str(&text).map_err(|e| ReconError::DatasetParse {
        dataset: kind,
        message: e.to_string(),
    })
}

/// Fetch a complete snapshot and reconcile it.
pub fn load_from<S: DatasetSource + ?Sized>(source: &S) -> Result<Bundle, ReconError> {
    let datasets = fetch_all(source)?;
    Ok(engine::load(&datasets))
}

/// Fetch the ID document `name`. The file must exist and be JSON; its
/// shape is coerced by [`parse_ids`].
pub fn load_ids<S: DatasetSource + ?Sized>(source: &S, name: &str) -> Result<Vec<IdCard>, ReconError> {
    let text = source.fetch_file(name)?;
    let doc: Value = serde_json::from_str(&text).map_err(|e| ReconError::DocumentParse {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    let cards = parse_ids(&doc);
    log::debug!("{} ID card(s) from {}", cards.len(), source.describe());
    Ok(cards)
}
