//! `escape` pass: escape reserved characters in chapter files, in place.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use bookforge_latex::escape_reserved;
use bookforge_shared::{AppConfig, BookforgeError, OutcomeCounts, Result};

use crate::fs::{file_name, list_files};
use crate::progress::{ItemEvent, ProgressReporter, Tally};

/// Configuration for the `escape` pass.
#[derive(Debug, Clone)]
pub struct EscapeConfig {
    pub chapters_dir: PathBuf,
    /// Chapter file extension, without the dot.
    pub extension: String,
}

impl From<&AppConfig> for EscapeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            chapters_dir: config.paths.chapters_dir.clone(),
            extension: config.chapters.extension.clone(),
        }
    }
}

/// Result of the `escape` pass.
#[derive(Debug, Serialize)]
pub struct EscapeResult {
    pub counts: OutcomeCounts,
    pub elapsed: Duration,
}

/// Escape `#` and `_` in every chapter file.
///
/// Files that need no change are not rewritten. A write that fails part-way
/// is not rolled back.
#[instrument(skip_all, fields(dir = %config.chapters_dir.display()))]
pub fn escape_chapters(
    config: &EscapeConfig,
    progress: &dyn ProgressReporter,
) -> Result<EscapeResult> {
    let start = Instant::now();
    let files = list_files(&config.chapters_dir, &config.extension)?;

    info!(count = files.len(), "escaping special characters");
    progress.phase("Escaping special characters", files.len());

    let mut tally = Tally::new(progress);

    for path in &files {
        let name = file_name(path);
        tally.report(ItemEvent::Started { name: &name });

        match escape_file(path) {
            Ok(true) => {
                debug!(file = %name, "escaped");
                tally.report(ItemEvent::Succeeded {
                    name: &name,
                    output: &name,
                });
            }
            Ok(false) => tally.report(ItemEvent::Unchanged { name: &name }),
            Err(e) => {
                warn!(file = %name, error = %e, "escaping failed, skipping file");
                tally.report(ItemEvent::Failed {
                    name: &name,
                    error: &e,
                });
            }
        }
    }

    let counts = tally.finish();
    info!(fixed = counts.succeeded, unchanged = counts.unchanged, failed = counts.failed, "escaping complete");

    Ok(EscapeResult {
        counts,
        elapsed: start.elapsed(),
    })
}

/// Returns whether the file content changed.
fn escape_file(path: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(path).map_err(|e| BookforgeError::read(path, e))?;
    let escaped = escape_reserved(&content);
    if escaped == content {
        return Ok(false);
    }

    std::fs::write(path, escaped).map_err(|e| BookforgeError::write(path, e))?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentProgress;

    fn setup() -> (tempfile::TempDir, EscapeConfig) {
        let tmp = tempfile::tempdir().unwrap();
        let config = EscapeConfig {
            chapters_dir: tmp.path().to_path_buf(),
            extension: "tex".into(),
        };
        (tmp, config)
    }

    #[test]
    fn escapes_in_place() {
        let (tmp, config) = setup();
        let path = tmp.path().join("02-a.tex");
        std::fs::write(&path, "\\chapter{A}\n\na_b#c\\_d\\#e\n\n").unwrap();

        let result = escape_chapters(&config, &SilentProgress).unwrap();

        assert_eq!(result.counts.succeeded, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "\\chapter{A}\n\na\\_b\\#c\\_d\\#e\n\n"
        );
    }

    #[test]
    fn second_run_changes_nothing() {
        let (tmp, config) = setup();
        let path = tmp.path().join("02-a.tex");
        std::fs::write(&path, "# heading_one\n").unwrap();

        escape_chapters(&config, &SilentProgress).unwrap();
        let once = std::fs::read_to_string(&path).unwrap();
        let result = escape_chapters(&config, &SilentProgress).unwrap();

        assert_eq!(result.counts.unchanged, 1);
        assert_eq!(result.counts.succeeded, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), once);
    }

    #[test]
    fn only_matching_extension_touched() {
        let (tmp, config) = setup();
        std::fs::write(tmp.path().join("notes.txt"), "a_b").unwrap();
        std::fs::write(tmp.path().join("02.tex"), "a_b").unwrap();

        let result = escape_chapters(&config, &SilentProgress).unwrap();

        assert_eq!(result.counts.total(), 1);
        assert_eq!(std::fs::read_to_string(tmp.path().join("notes.txt")).unwrap(), "a_b");
    }

    #[test]
    fn unreadable_file_does_not_stop_batch() {
        let (tmp, config) = setup();
        std::fs::write(tmp.path().join("02.tex"), [0xffu8, 0xfe]).unwrap();
        std::fs::write(tmp.path().join("03.tex"), "x_y").unwrap();

        let result = escape_chapters(&config, &SilentProgress).unwrap();

        assert_eq!(result.counts.failed, 1);
        assert_eq!(result.counts.succeeded, 1);
        assert_eq!(std::fs::read_to_string(tmp.path().join("03.tex")).unwrap(), "x\\_y");
    }
}
