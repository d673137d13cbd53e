//! Candidate Scanner
//!
//! Finds index documents under the publish root and converts their
//! relative paths into bucket keys.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::key::ObjectKey;

/// An index document found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path on the local filesystem
    pub path: PathBuf,
    /// Key of the already-uploaded object
    pub key: ObjectKey,
}

/// Find every file named `index_document` under `root`, at any depth.
///
/// Entries are visited in file-name order so repeated scans of an
/// unchanged tree yield the same sequence. Symlinked files and directories
/// are followed; a link cycle is reported as a walk error.
pub fn find_index_documents(root: &Path, index_document: &str) -> Result<Vec<Candidate>> {
    let metadata = std::fs::metadata(root)?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name() != index_document {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| Error::InvalidKey(format!("{} escapes the publish root", entry.path().display())))?;
        let key = ObjectKey::from_relative_path(relative)?;

        debug!("Found index document {}", key);
        candidates.push(Candidate {
            path: entry.into_path(),
            key,
        });
    }

    Ok(candidates)
}
