//! Datasets served over HTTP: `<base_url>/<file name>`, one GET each.

use std::time::Duration;

use jobwallet_recon::config::FileNames;
use jobwallet_recon::{DatasetKind, DatasetSource, ReconError};

const USER_AGENT: &str = concat!("jobwallet/", env!("CARGO_PKG_VERSION"));

pub struct HttpSource {
    base_url: String,
    files: FileNames,
    http: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base_url: &str, files: FileNames, timeout: Duration) -> Result<Self, ReconError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ReconError::Io(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            files,
            http,
        })
    }

    pub fn url(&self, kind: DatasetKind) -> String {
        self.file_url(self.files.name(kind))
    }

    fn file_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    /// Body of a 2xx response; the error is the message only.
    fn get(&self, url: &str) -> Result<String, String> {
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|e| format!("GET {url}: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("GET {url}: HTTP {}", status.as_u16()));
        }

        resp.text().map_err(|e| format!("GET {url}: {e}"))
    }
}

impl DatasetSource for HttpSource {
    fn fetch(&self, kind: DatasetKind) -> Result<String, ReconError> {
        self.get(&self.url(kind))
            .map_err(|message| ReconError::DatasetFetch { dataset: kind, message })
    }

    fn fetch_file(&self, name: &str) -> Result<String, ReconError> {
        self.get(&self.file_url(name))
            .map_err(|message| ReconError::DocumentFetch { name: name.to_string(), message })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
