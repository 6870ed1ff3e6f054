//! Backup list loading.
//!
//! The backup list is a JWCC file (JSON with comments and trailing
//! commas) declaring the destination directory name, the paths to back up
//! and the base names to skip.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Declarative description of one backup run. Read once, never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupList {
    /// Remote directory name all uploads are placed under.
    pub dirname: String,
    /// File or directory paths to back up, in upload order.
    #[serde(default)]
    pub files: Vec<String>,
    /// Base names to skip wherever they occur in the tree.
    #[serde(default)]
    pub ignore: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read backup list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse backup list {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
    #[error("backup list {path} declares an empty dirname")]
    EmptyDirname { path: PathBuf },
}

impl BackupList {
    /// Load a backup list from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        info!(path = %path.display(), "reading backup list file");

        let raw = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let list: BackupList = json5::from_str(&raw).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if list.dirname.is_empty() {
            return Err(ManifestError::EmptyDirname {
                path: path.to_path_buf(),
            });
        }
        Ok(list)
    }

    /// Whether a base name is excluded from backup. Exact match only, no
    /// globbing, no case folding.
    pub fn is_ignored(&self, base_name: &str) -> bool {
        self.ignore.iter().any(|name| name == base_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with_ignore(ignore: &[&str]) -> BackupList {
        BackupList {
            dirname: "backups".into(),
            files: vec![],
            ignore: ignore.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn ignore_matches_exact_base_names_only() {
        let list = list_with_ignore(&[".git", ".DS_Store"]);
        assert!(list.is_ignored(".git"));
        assert!(list.is_ignored(".DS_Store"));
        assert!(!list.is_ignored(".gitignore"));
        assert!(!list.is_ignored(".GIT"));
        assert!(!list.is_ignored("src/.git"));
    }

    #[test]
    fn an_empty_ignore_list_matches_nothing() {
        let list = list_with_ignore(&[]);
        assert!(!list.is_ignored(".git"));
    }
}
