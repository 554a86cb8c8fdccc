//! `renumber` pass: rename chapter files to canonical names and keep the
//! master document's `\input` lines in sync.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use bookforge_latex::{normalized_chapter_name, rewrite_includes};
use bookforge_shared::{AppConfig, BookforgeError, OutcomeCounts, RenamePair, Result};

use crate::fs::{file_name, list_files};
use crate::progress::{ItemEvent, ProgressReporter, Tally};

/// Configuration for the `renumber` pass.
#[derive(Debug, Clone)]
pub struct RenumberConfig {
    pub chapters_dir: PathBuf,
    /// Master document whose `\input` lines are rewritten.
    pub master_document: PathBuf,
    /// Chapter file extension, without the dot.
    pub extension: String,
    /// Path prefix used inside `\input{...}`.
    pub include_dir: String,
    /// Plan and report without touching the filesystem.
    pub dry_run: bool,
}

impl From<&AppConfig> for RenumberConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            chapters_dir: config.paths.chapters_dir.clone(),
            master_document: config.paths.master_document.clone(),
            extension: config.chapters.extension.clone(),
            include_dir: config.chapters.include_dir.clone(),
            dry_run: false,
        }
    }
}

/// What happened to the master document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MasterUpdate {
    /// No file was renamed, so the master document was not opened.
    NotNeeded,
    /// References were rewritten (zero if none matched).
    Updated { replacements: usize },
    /// Dry run: references that would be rewritten.
    Planned { replacements: usize },
    /// The master document could not be read or written; renames stand.
    Failed { error: String },
}

/// Result of the `renumber` pass.
#[derive(Debug, Serialize)]
pub struct RenumberResult {
    /// `succeeded` = renamed, `unchanged` = no change needed.
    pub counts: OutcomeCounts,
    pub renamed: Vec<RenamePair>,
    pub master: MasterUpdate,
    pub dry_run: bool,
    pub elapsed: Duration,
}

/// Rename every chapter file to its canonical name, then update the master document.
#[instrument(skip_all, fields(dir = %config.chapters_dir.display(), dry_run = config.dry_run))]
pub fn renumber_chapters(
    config: &RenumberConfig,
    progress: &dyn ProgressReporter,
) -> Result<RenumberResult> {
    let start = Instant::now();
    let master = std::fs::canonicalize(&config.master_document).ok();
    let files: Vec<PathBuf> = list_files(&config.chapters_dir, &config.extension)?
        .into_iter()
        .filter(|p| master.is_none() || std::fs::canonicalize(p).ok() != master)
        .collect();

    info!(count = files.len(), "renaming chapter files");
    progress.phase("Renaming chapters", files.len());

    let mut tally = Tally::new(progress);
    let mut renamed = Vec::new();
    let mut claimed = HashSet::new();

    for path in &files {
        let old_name = file_name(path);
        tally.report(ItemEvent::Started { name: &old_name });

        let new_name = normalized_chapter_name(&old_name, &config.extension);
        if new_name == old_name {
            tally.report(ItemEvent::Unchanged { name: &old_name });
            continue;
        }

        let target = config.chapters_dir.join(&new_name);
        match rename_file(path, &target, config.dry_run, claimed.contains(&new_name)) {
            Ok(()) => {
                debug!(from = %old_name, to = %new_name, "renamed");
                tally.report(ItemEvent::Succeeded {
                    name: &old_name,
                    output: &new_name,
                });
                claimed.insert(new_name.clone());
                renamed.push(RenamePair::new(old_name, new_name));
            }
            Err(e) => {
                warn!(file = %old_name, error = %e, "rename failed, skipping file");
                tally.report(ItemEvent::Failed {
                    name: &old_name,
                    error: &e,
                });
            }
        }
    }

    let counts = tally.finish();
    info!(renamed = counts.succeeded, unchanged = counts.unchanged, failed = counts.failed, "renaming complete");

    let master = if renamed.is_empty() {
        MasterUpdate::NotNeeded
    } else {
        match update_master(config, &renamed) {
            Ok(update) => update,
            Err(e) => {
                warn!(error = %e, "master document not updated; renames are kept");
                MasterUpdate::Failed {
                    error: e.to_string(),
                }
            }
        }
    };

    Ok(RenumberResult {
        counts,
        renamed,
        master,
        dry_run: config.dry_run,
        elapsed: start.elapsed(),
    })
}

/// In-place rename that never overwrites an existing file.
fn rename_file(from: &Path, to: &Path, dry_run: bool, claimed: bool) -> Result<()> {
    if claimed || to.exists() {
        return Err(BookforgeError::rename(
            from,
            to,
            std::io::Error::new(ErrorKind::AlreadyExists, "destination already exists"),
        ));
    }
    if dry_run {
        return Ok(());
    }
    std::fs::rename(from, to).map_err(|e| BookforgeError::rename(from, to, e))
}

/// Rewrite `\input` lines for the performed renames.
fn update_master(config: &RenumberConfig, renamed: &[RenamePair]) -> Result<MasterUpdate> {
    let path = &config.master_document;
    let content =
        std::fs::read_to_string(path).map_err(|e| BookforgeError::reference_update(path, e))?;

    let pairs = renamed.iter().map(|r| (r.from.as_str(), r.to.as_str()));
    let (updated, replacements) = rewrite_includes(&content, &config.include_dir, pairs);

    if config.dry_run {
        return Ok(MasterUpdate::Planned { replacements });
    }

    if replacements > 0 {
        std::fs::write(path, updated).map_err(|e| BookforgeError::reference_update(path, e))?;
    }
    info!(path = %path.display(), replacements, "updated master document");

    Ok(MasterUpdate::Updated { replacements })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
