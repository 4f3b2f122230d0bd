use std::fmt;

use crate::dataset::DatasetKind;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (no source, both sources, empty file name, etc.).
    ConfigValidation(String),
    /// A dataset could not be retrieved from its source.
    DatasetFetch { dataset: DatasetKind, message: String },
    /// A dataset was retrieved but is not valid JSON.
    DatasetParse { dataset: DatasetKind, message: String },
    /// A side document (such as the ID list) could not be retrieved.
    DocumentFetch { name: String, message: String },
    /// A side document was retrieved but is not valid JSON.
    DocumentParse { name: String, message: String },
    /// Key-value store write failure.
    Store(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl ReconError {
    /// The dataset a load failure refers to, if any.
    pub fn dataset(&self) -> Option<DatasetKind> {
        match self {
            Self::DatasetFetch { dataset, .. } | Self::DatasetParse { dataset, .. } => Some(*dataset),
            _ => None,
        }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DatasetFetch { dataset, message } => {
                write!(f, "dataset '{dataset}': cannot fetch: {message}")
            }
            Self::DatasetParse { dataset, message } => {
                write!(f, "dataset '{dataset}': invalid JSON: {message}")
            }
            Self::DocumentFetch { name, message } => write!(f, "'{name}': cannot fetch: {message}"),
            Self::DocumentParse { name, message } => write!(f, "'{name}': invalid JSON: {message}"),
            Self::Store(msg) => write!(f, "store error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
