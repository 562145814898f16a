//! Widget configuration.
//!
//! Read from a JSON file; every field has a default so a partial file (or no
//! file at all) is valid. Command-line flags override what the file says.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::services::FetchOrdering;

/// Errors loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Settings for one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Site root the API paths are resolved against.
    pub base_url: String,
    /// Whether "add new" links are shown.
    pub logged_in: bool,
    /// Delay before a typed query is committed. Zero commits every keystroke.
    pub debounce_ms: u64,
    /// How overlapping responses are applied.
    pub ordering: FetchOrdering,
    /// Per-request timeout; none leaves the client default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888/".to_string(),
            logged_in: false,
            debounce_ms: 0,
            ordering: FetchOrdering::ArrivalOrder,
            request_timeout_secs: None,
        }
    }
}

impl WidgetConfig {
    /// `<config dir>/config.json` for this application.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "juju", "interfaces-index")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads `path`, or the default location if it exists, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads config from `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parsed base URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |source: url::ParseError| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        };
        let url = Url::parse(&self.base_url).map_err(invalid)?;
        if url.cannot_be_a_base() {
            return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(url)
    }

    /// Commit delay for typed queries.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Per-request timeout, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
