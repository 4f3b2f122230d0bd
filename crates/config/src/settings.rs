// Application settings
// Loaded from ~/.config/jobwallet/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Ordering of the category explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySort {
    /// Alphabetical by category name (default)
    #[default]
    Name,
    /// Most occupations first, ties alphabetical
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Data source
    #[serde(rename = "data.dir")]
    pub data_dir: Option<PathBuf>,

    #[serde(rename = "data.url")]
    pub data_url: Option<String>,

    /// TOML data config (source + file names); wins over dir/url
    #[serde(rename = "data.config")]
    pub data_config: Option<PathBuf>,

    // Wallet
    #[serde(rename = "wallet.storePath")]
    pub store_path: Option<PathBuf>,

    // Explorer
    #[serde(rename = "explorer.sortBy")]
    pub category_sort: CategorySort,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            data_url: None,
            data_config: None,
            store_path: None, // None = platform data dir
            category_sort: CategorySort::Name,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jobwallet")
            .join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file gives defaults; an
    /// unreadable or invalid one gives defaults and a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        log::warn!("error parsing {}: {e}; using default settings", path.display());
                        Self::default()
                    }
                }
            }
            Err(e) => {
                log::warn!("error reading {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Where the wallet store lives
    pub fn effective_store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(crate::store::FileStore::default_path)
    }
}
