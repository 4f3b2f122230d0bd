use std::path::PathBuf;

use serde::Deserialize;

use crate::dataset::DatasetKind;
use crate::error::ReconError;
use crate::ids::IDS_FILE;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Where and how to fetch the datasets.
///
/// ```toml
/// timeout_secs = 20
///
/// [source]
/// url = "https://example.org/data"
///
/// [files]
/// wages = "wages_2024.json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub files: FileNames,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Exactly one of `dir` or `url`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// File names
// ---------------------------------------------------------------------------

/// Per-dataset file name overrides; unset entries use the default name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileNames {
    #[serde(default)]
    pub dwa: Option<String>,
    #[serde(default)]
    pub contexts: Option<String>,
    #[serde(default)]
    pub tech_skills: Option<String>,
    #[serde(default)]
    pub tasks: Option<String>,
    #[serde(default)]
    pub descriptions: Option<String>,
    #[serde(default)]
    pub wages: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    /// ID card document; not one of the reconciled datasets.
    #[serde(default)]
    pub ids: Option<String>,
}

impl FileNames {
    fn slot(&self, kind: DatasetKind) -> &Option<String> {
        match kind {
            DatasetKind::Dwa => &self.dwa,
            DatasetKind::Contexts => &self.contexts,
            DatasetKind::TechSkills => &self.tech_skills,
            DatasetKind::Tasks => &self.tasks,
            DatasetKind::Descriptions => &self.descriptions,
            DatasetKind::Wages => &self.wages,
            DatasetKind::Categories => &self.categories,
        }
    }

    pub fn name(&self, kind: DatasetKind) -> &str {
        self.slot(kind)
            .as_deref()
            .unwrap_or_else(|| kind.default_file_name())
    }

    pub fn ids_name(&self) -> &str {
        self.ids.as_deref().unwrap_or(IDS_FILE)
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl DataConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: DataConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config for a local data directory with default file names.
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: SourceConfig { dir: Some(dir.into()), url: None },
            files: FileNames::default(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Config for an HTTP base URL with default file names.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            source: SourceConfig { dir: None, url: Some(url.into()) },
            files: FileNames::default(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        match (&self.source.dir, &self.source.url) {
            (Some(_), Some(_)) => {
                return Err(ReconError::ConfigValidation(
                    "source: set either dir or url, not both".into(),
                ))
            }
            (None, None) => {
                return Err(ReconError::ConfigValidation(
                    "source: one of dir or url is required".into(),
                ))
            }
            (None, Some(url)) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                return Err(ReconError::ConfigValidation(format!(
                    "source.url must be http(s), got '{url}'"
                )))
            }
            _ => {}
        }

        for kind in DatasetKind::ALL {
            let name = self.files.name(kind);
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "files.{kind}: file name is empty"
                )));
            }
        }

        if self.files.ids_name().trim().is_empty() {
            return Err(ReconError::ConfigValidation("files.ids: file name is empty".into()));
        }

        if self.timeout_secs == 0 {
            return Err(ReconError::ConfigValidation(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dir_source() {
        let config = DataConfig::from_toml(
            r#"
[source]
dir = "./data"
"#,
        )
        .unwrap();
        assert_eq!(config.source.dir, Some(PathBuf::from("./data")));
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.files.name(DatasetKind::Dwa), "jobs_dwa.json");
        assert_eq!(config.files.ids_name(), "ids.json");
    }

    #[test]
    fn ids_file_override() {
        let config =
            DataConfig::from_toml("[source]\ndir = \".\"\n[files]\nids = \"cards.json\"\n").unwrap();
        assert_eq!(config.files.ids_name(), "cards.json");
        let err = DataConfig::from_toml("[source]\ndir = \".\"\n[files]\nids = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("files.ids"));
    }

    #[test]
    fn parse_url_with_overrides() {
        let config = DataConfig::from_toml(
            r#"
timeout_secs = 30

[source]
url = "https://example.org/data"

[files]
wages = "wages_2024.json"
tech_skills = "tech.json"
"#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.files.name(DatasetKind::Wages), "wages_2024.json");
        assert_eq!(config.files.name(DatasetKind::TechSkills), "tech.json");
        assert_eq!(config.files.name(DatasetKind::Categories), "occupations_by_category.json");
    }

    #[test]
    fn both_sources_rejected() {
        let err = DataConfig::from_toml(
            r#"
[source]
dir = "."
url = "https://example.org"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn missing_source_rejected() {
        let err = DataConfig::from_toml("[source]\n").unwrap_err();
        assert!(err.to_string().contains("one of dir or url"));
    }

    #[test]
    fn non_http_url_rejected() {
        let err = DataConfig::from_toml("[source]\nurl = \"ftp://x\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn unknown_dataset_name_is_parse_error() {
        let err = DataConfig::from_toml("[source]\ndir = \".\"\n[files]\nsalaries = \"x.json\"\n")
            .unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn empty_file_name_rejected() {
        let err = DataConfig::from_toml("[source]\ndir = \".\"\n[files]\ndwa = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("files.dwa"));
    }
}
