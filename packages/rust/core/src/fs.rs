//! Directory enumeration helpers.

use std::path::{Path, PathBuf};

use bookforge_shared::{BookforgeError, Result};

/// List regular files in `dir` whose extension is exactly `extension`,
/// sorted by filename.
pub(crate) fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| BookforgeError::enumerate(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BookforgeError::enumerate(dir, e))?.path();
        let matches = path
            .extension()
            .is_some_and(|ext| ext == extension);
        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Filename of `path` as a displayable string.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Filename of `path` without its extension.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
