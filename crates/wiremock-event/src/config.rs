//! Event properties and the resolved WireMock configuration.
//!
//! The host scheduler hands every event a flat string property bag. The keys
//! read here are:
//!
//! | key                 | required | meaning                                   |
//! |---------------------|----------|-------------------------------------------|
//! | `wiremockFilesDir`  | yes      | directory holding the stub-definition files |
//! | `wiremockUrl`       | yes      | comma-separated WireMock base URLs        |
//! | `wiremockTimeoutMs` | no       | per-request upload timeout (default 10000) |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::client::DEFAULT_TIMEOUT;

pub const WIREMOCK_FILES_DIR: &str = "wiremockFilesDir";
pub const WIREMOCK_URL: &str = "wiremockUrl";
pub const WIREMOCK_TIMEOUT_MS: &str = "wiremockTimeoutMs";

/// Fatal configuration problems, raised before the test starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("property {0} is not set")]
    MissingProperty(&'static str),
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("property {} contains no endpoint urls", WIREMOCK_URL)]
    NoEndpoints,
    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("property {} must be a positive integer, got '{}'", WIREMOCK_TIMEOUT_MS, .0)]
    InvalidTimeout(String),
    #[error("failed to load properties from {}: {message}", .path.display())]
    PropertiesFile { path: PathBuf, message: String },
}

/// Identity of the test run an event belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestContext {
    pub test_run_id: String,
}

impl TestContext {
    pub fn new(test_run_id: impl Into<String>) -> Self {
        Self {
            test_run_id: test_run_id.into(),
        }
    }
}

/// Flat string properties supplied by the host for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventProperties {
    values: BTreeMap<String, String>,
}

impl EventProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load properties from a YAML mapping of string keys to scalar values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let load_err = |message: String| ConfigError::PropertiesFile {
            path: path.to_path_buf(),
            message,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let raw: BTreeMap<String, serde_yaml::Value> =
            serde_yaml::from_str(&contents).map_err(|e| load_err(e.to_string()))?;

        let mut properties = Self::new();
        for (key, value) in raw {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => continue,
                _ => return Err(load_err(format!("property {key} must be a scalar value"))),
            };
            properties.set(key, value);
        }
        Ok(properties)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Overlay `other` on top of these properties.
    pub fn merge(&mut self, other: EventProperties) {
        self.values.extend(other.values);
    }
}

impl<K, V> FromIterator<(K, V)> for EventProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.set(key, value);
        }
        properties
    }
}

/// Configuration resolved at before-test, immutable for the rest of the test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiremockSettings {
    pub files_dir: PathBuf,
    pub endpoints: Vec<String>,
    pub timeout: Duration,
}

impl WiremockSettings {
    /// Resolve and validate the settings from an event's properties.
    ///
    /// The files directory must exist. Endpoint URLs are split on `,` and
    /// trimmed; empty segments are dropped.
    pub fn from_properties(properties: &EventProperties) -> Result<Self, ConfigError> {
        let files_dir = properties
            .get(WIREMOCK_FILES_DIR)
            .ok_or(ConfigError::MissingProperty(WIREMOCK_FILES_DIR))?;
        let files_dir = PathBuf::from(files_dir);
        if !files_dir.exists() {
            return Err(ConfigError::DirectoryNotFound(files_dir));
        }
        if !files_dir.is_dir() {
            return Err(ConfigError::NotADirectory(files_dir));
        }

        let urls = properties
            .get(WIREMOCK_URL)
            .ok_or(ConfigError::MissingProperty(WIREMOCK_URL))?;
        let endpoints = split_endpoints(urls);
        if endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        let timeout = match properties.get(WIREMOCK_TIMEOUT_MS) {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => return Err(ConfigError::InvalidTimeout(raw.to_string())),
            },
        };

        Ok(Self {
            files_dir,
            endpoints,
            timeout,
        })
    }
}

fn split_endpoints(urls: &str) -> Vec<String> {
    urls.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect()
}
