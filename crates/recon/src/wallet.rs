//! The user's wallet of imported DWA credentials.
//!
//! The wallet is an ordered list, most recently imported first, without
//! duplicates. It persists as a JSON array under [`WALLET_KEY`] in any
//! string key-value store.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::ReconError;
use crate::index::DwaIndex;

pub const WALLET_KEY: &str = "jobwallet.wallet";

/// Opaque string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ReconError>;
    fn remove(&mut self, key: &str) -> Result<(), ReconError>;
}

/// Process-local store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore(HashMap<String, String>);

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ReconError> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ReconError> {
        self.0.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported,
    AlreadyImported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletEntry {
    pub dwa: String,
    pub occupations: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Wallet {
    items: Vec<String>,
}

impl Wallet {
    /// Read the wallet from a store. Missing, unparseable, or non-array
    /// content reads as an empty wallet; non-string and repeated entries
    /// are skipped.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(WALLET_KEY) else {
            return Self::default();
        };
        let items = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(values)) => {
                let mut seen = HashSet::new();
                values
                    .into_iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .filter(|s| seen.insert(s.clone()))
                    .collect()
            }
            Ok(_) => {
                log::warn!("stored wallet is not a JSON array; starting empty");
                Vec::new()
            }
            Err(e) => {
                log::warn!("stored wallet is not valid JSON ({e}); starting empty");
                Vec::new()
            }
        };
        Self { items }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), ReconError> {
        let json = serde_json::to_string(&self.items).map_err(|e| ReconError::Store(e.to_string()))?;
        store.set(WALLET_KEY, &json)
    }

    /// Prepend `dwa` unless already present.
    pub fn import(&mut self, dwa: &str) -> ImportOutcome {
        if self.contains(dwa) {
            return ImportOutcome::AlreadyImported;
        }
        self.items.insert(0, dwa.to_string());
        ImportOutcome::Imported
    }

    /// Remove every occurrence; returns how many were removed.
    pub fn remove(&mut self, dwa: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|d| d != dwa);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, dwa: &str) -> bool {
        self.items.iter().any(|d| d == dwa)
    }

    /// Most recent first.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Occupations associated with `dwa` in the given index.
    pub fn count(&self, dwa: &str, index: &DwaIndex) -> usize {
        index.count(dwa)
    }

    /// Wallet contents with occupation counts, in wallet order.
    pub fn entries(&self, index: &DwaIndex) -> Vec<WalletEntry> {
        self.items
            .iter()
            .map(|d| WalletEntry {
                dwa: d.clone(),
                occupations: index.count(d),
            })
            .collect()
    }
}
