//! Import pass: list a stub directory, substitute and upload every eligible file.
//!
//! Only regular, readable files directly inside the root directory are
//! imported. Each file is read once, substituted once, then uploaded to every
//! endpoint in turn. A failure on one file or one endpoint never stops the
//! rest of the pass; every attempt is recorded in the returned
//! [`ImportReport`].

use crate::client::StubUploader;
use crate::report::{ImportReport, SkipReason};
use crate::settings::Replacements;
use crate::template;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort an import pass before any file is processed
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to list directory {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Imports the stub files found in one root directory.
#[derive(Debug, Clone)]
pub struct Importer {
    root: PathBuf,
    verbose: bool,
}

impl Importer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            verbose: false,
        }
    }

    /// Log per-entry checks and unresolved placeholders at info level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run one import pass against `uploaders`.
    pub fn import_all(
        &self,
        uploaders: &[Box<dyn StubUploader>],
        replacements: &Replacements,
    ) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport::new();

        for path in self.list_entries()? {
            report.entries_checked += 1;
            if self.verbose {
                info!(file = %path.display(), "check");
            } else {
                debug!(file = %path.display(), "check");
            }

            let content = match read_eligible(&path) {
                Ok(content) => content,
                Err(reason) => {
                    match &reason {
                        SkipReason::Directory => debug!(file = %path.display(), "skipping directory"),
                        SkipReason::Unreadable(e) => {
                            debug!(file = %path.display(), error = %e, "skipping unreadable entry")
                        }
                        SkipReason::ReadFailed(e) => {
                            warn!(file = %path.display(), error = %e, "reading file failed")
                        }
                    }
                    report.record_skip(path, reason);
                    continue;
                }
            };

            info!(file = %path.display(), "import");
            if self.verbose {
                let missing = template::unresolved(&content, replacements);
                if !missing.is_empty() {
                    info!(file = %path.display(), placeholders = ?missing, "unresolved placeholders");
                }
            }

            let substituted = template::substitute(&content, replacements);
            report.files_imported += 1;

            for uploader in uploaders {
                let error = match uploader.upload(&substituted) {
                    Ok(()) => {
                        debug!(file = %path.display(), endpoint = uploader.endpoint(), "uploaded");
                        None
                    }
                    Err(e) => {
                        warn!(
                            file = %path.display(),
                            endpoint = uploader.endpoint(),
                            error = %e,
                            "upload failed"
                        );
                        Some(e.to_string())
                    }
                };
                report.record_upload(path.clone(), uploader.endpoint(), error);
            }
        }

        Ok(report)
    }

    /// Immediate entries of the root directory, sorted by path.
    fn list_entries(&self) -> Result<Vec<PathBuf>, ImportError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| ImportError::ListDirectory {
            path: self.root.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => warn!(dir = %self.root.display(), error = %e, "skipping unlistable entry"),
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// Read a directory entry if it is a regular, readable UTF-8 file.
fn read_eligible(path: &Path) -> Result<String, SkipReason> {
    // Follows symlinks; a dangling link surfaces here as unreadable.
    let metadata = std::fs::metadata(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    if metadata.is_dir() {
        return Err(SkipReason::Directory);
    }
    if !metadata.is_file() {
        return Err(SkipReason::Unreadable("not a regular file".to_string()));
    }

    let mut file = File::open(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| SkipReason::ReadFailed(e.to_string()))?;
    Ok(content)
}
