//! Directory enumeration
//!
//! One level only: the root yields scan directories, a scan directory yields
//! its entries. Nothing here recurses.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::IndexerError;

/// Returns the immediate children of `root` that are directories.
///
/// Each path is `root` joined with the entry name. Symlinks pointing at
/// directories count as directories. Order follows the filesystem listing
/// unless `sorted` is set.
///
/// # Errors
///
/// [`IndexerError::Io`] when `root` does not exist or cannot be listed.
pub fn list_scan_dirs(root: &Path, sorted: bool) -> Result<Vec<PathBuf>, IndexerError> {
    let dirs: Vec<PathBuf> = list_entries(root, sorted)?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect();

    debug!(root = %root.display(), count = dirs.len(), "enumerated scan directories");
    Ok(dirs)
}

/// Returns every entry directly inside `dir` (files, directories, anything
/// else), as `dir` joined with the entry name.
///
/// Unreadable individual entries are logged and skipped; failing to open
/// `dir` itself is an error.
pub fn list_entries(dir: &Path, sorted: bool) -> Result<Vec<PathBuf>, IndexerError> {
    let entries = std::fs::read_dir(dir).map_err(|e| IndexerError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        paths.push(dir.join(entry.file_name()));
    }

    if sorted {
        paths.sort();
    }

    Ok(paths)
}
