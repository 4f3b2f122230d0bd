// File-backed key-value store
// One JSON object per file: { "key": "string value", ... }

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use jobwallet_recon::wallet::KeyValueStore;
use jobwallet_recon::ReconError;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Default store location in the platform data dir
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jobwallet")
            .join("store.json")
    }

    /// Open the store at `path`. A missing file is an empty store; a
    /// corrupt one is treated as empty and overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("store {} is corrupt ({e}); starting empty", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    fn flush(&self) -> Result<(), ReconError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ReconError::Store(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ReconError::Store(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| ReconError::Store(format!("{}: {e}", self.path.display())))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ReconError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), ReconError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
