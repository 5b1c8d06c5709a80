//! Outcome types for an import pass.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Why a directory entry produced no upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Entry is a directory.
    Directory,
    /// Entry could not be opened for reading (permissions, dangling link).
    Unreadable(String),
    /// Entry opened but its content could not be read as UTF-8 text.
    ReadFailed(String),
}

impl SkipReason {
    /// Whether this skip is a recoverable error rather than a filter.
    pub fn is_error(&self) -> bool {
        matches!(self, SkipReason::ReadFailed(_))
    }
}

/// A directory entry that was not imported.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Result of one upload unit (one file to one endpoint).
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    #[serde(serialize_with = "serialize_path")]
    pub file: PathBuf,
    pub endpoint: String,
    /// Error message when the upload failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

fn serialize_path<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&path.to_string_lossy())
}

/// Result of one import pass.
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    /// Directory entries inspected.
    pub entries_checked: usize,
    /// Files that were read and substituted (each produced one unit per endpoint).
    pub files_imported: usize,
    /// Entries that produced no upload.
    pub skipped: Vec<SkippedEntry>,
    /// One outcome per attempted upload unit, in attempt order.
    pub uploads: Vec<UploadOutcome>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skip(&mut self, path: PathBuf, reason: SkipReason) {
        self.skipped.push(SkippedEntry { path, reason });
    }

    pub fn record_upload(&mut self, file: PathBuf, endpoint: &str, error: Option<String>) {
        self.uploads.push(UploadOutcome {
            file,
            endpoint: endpoint.to_string(),
            error,
        });
    }

    /// Number of upload units attempted.
    pub fn attempted(&self) -> usize {
        self.uploads.len()
    }

    pub fn succeeded(&self) -> usize {
        self.uploads.iter().filter(|u| u.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Number of files that failed while being read.
    pub fn read_failures(&self) -> usize {
        self.skipped.iter().filter(|s| s.reason.is_error()).count()
    }

    /// True when no unit failed and no file failed to read.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.read_failures() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = ImportReport::new();
        report.entries_checked = 3;
        report.files_imported = 1;
        report.record_skip(PathBuf::from("dir"), SkipReason::Directory);
        report.record_upload(PathBuf::from("a.json"), "http://one", None);
        report.record_upload(
            PathBuf::from("a.json"),
            "http://two",
            Some("boom".to_string()),
        );

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.read_failures(), 0);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_read_failure_is_not_clean() {
        let mut report = ImportReport::new();
        report.record_skip(
            PathBuf::from("bad.json"),
            SkipReason::ReadFailed("invalid utf-8".to_string()),
        );
        report.record_skip(
            PathBuf::from("gone.json"),
            SkipReason::Unreadable("not found".to_string()),
        );
        assert_eq!(report.read_failures(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_serializes() {
        let mut report = ImportReport::new();
        report.record_skip(PathBuf::from("nested"), SkipReason::Directory);
        report.record_upload(PathBuf::from("a.json"), "http://one", None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["skipped"][0]["path"], "nested");
        assert_eq!(json["skipped"][0]["reason"]["kind"], "directory");
        assert_eq!(json["uploads"][0]["endpoint"], "http://one");
        assert!(json["uploads"][0].get("error").is_none());
    }
}
