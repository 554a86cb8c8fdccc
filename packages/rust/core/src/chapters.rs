//! `chapters` pass: plain-text files → numbered LaTeX chapter files.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use bookforge_latex::{chapter_file_name, derive_title, include_line, render_chapter};
use bookforge_shared::{AppConfig, BookforgeError, OutcomeCounts, Result};

use crate::extract::TEXT_EXTENSION;
use crate::fs::{file_name, file_stem, list_files};
use crate::progress::{ItemEvent, ProgressReporter, Tally};

/// Configuration for the `chapters` pass.
#[derive(Debug, Clone)]
pub struct BuildChaptersConfig {
    /// Directory holding `.txt` files.
    pub text_dir: PathBuf,
    /// Directory receiving chapter files (created if missing).
    pub chapters_dir: PathBuf,
    /// Number given to the first created chapter.
    pub start_number: u32,
    /// Chapter file extension, without the dot.
    pub extension: String,
    /// Path prefix used in the generated `\input` lines.
    pub include_dir: String,
    /// Sectioning command, e.g. `chapter`.
    pub heading: String,
}

impl From<&AppConfig> for BuildChaptersConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            text_dir: config.paths.text_dir.clone(),
            chapters_dir: config.paths.chapters_dir.clone(),
            start_number: config.chapters.start_number,
            extension: config.chapters.extension.clone(),
            include_dir: config.chapters.include_dir.clone(),
            heading: config.chapters.heading.clone(),
        }
    }
}

/// Result of the `chapters` pass.
#[derive(Debug, Serialize)]
pub struct BuildChaptersResult {
    pub counts: OutcomeCounts,
    /// Created chapter filenames, in number order.
    pub created: Vec<String>,
    /// One `\input{...}` line per created file, ready to paste into the master document.
    pub include_lines: Vec<String>,
    /// The number the next created chapter would get.
    pub next_number: u32,
    pub elapsed: Duration,
}

/// Wrap every text file in `text_dir` as a chapter file in `chapters_dir`.
///
/// Numbers are handed out in filename order and only consumed by files that
/// were actually written, so the created sequence has no gaps.
#[instrument(skip_all, fields(source = %config.text_dir.display(), out = %config.chapters_dir.display()))]
pub fn build_chapters(
    config: &BuildChaptersConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuildChaptersResult> {
    let start = Instant::now();
    let texts = list_files(&config.text_dir, TEXT_EXTENSION)?;

    let last_number = u32::try_from(texts.len())
        .ok()
        .and_then(|n| config.start_number.checked_add(n));
    if last_number.is_none() {
        return Err(BookforgeError::config(format!(
            "start number {} leaves no room to number {} chapters",
            config.start_number,
            texts.len()
        )));
    }

    std::fs::create_dir_all(&config.chapters_dir)
        .map_err(|e| BookforgeError::write(&config.chapters_dir, e))?;

    info!(count = texts.len(), start_number = config.start_number, "building chapter files");
    progress.phase("Creating chapters", texts.len());

    let mut tally = Tally::new(progress);
    let mut number = config.start_number;
    let mut created = Vec::new();

    for path in &texts {
        let name = file_name(path);
        tally.report(ItemEvent::Started { name: &name });

        match create_chapter(config, path, number) {
            Ok(Some(out_name)) => {
                debug!(text = %name, chapter = %out_name, number, "created chapter");
                tally.report(ItemEvent::Succeeded {
                    name: &name,
                    output: &out_name,
                });
                created.push(out_name);
                number += 1;
            }
            Ok(None) => {
                warn!(text = %name, "empty text file, skipping");
                tally.report(ItemEvent::Skipped {
                    name: &name,
                    reason: "empty file",
                });
            }
            Err(e) => {
                warn!(text = %name, error = %e, "chapter creation failed, skipping file");
                tally.report(ItemEvent::Failed {
                    name: &name,
                    error: &e,
                });
            }
        }
    }

    let counts = tally.finish();
    let include_lines = created
        .iter()
        .map(|f| include_line(&config.include_dir, f))
        .collect();

    info!(created = created.len(), failed = counts.failed, "chapter creation complete");

    Ok(BuildChaptersResult {
        counts,
        created,
        include_lines,
        next_number: number,
        elapsed: start.elapsed(),
    })
}

/// Write one chapter file. `Ok(None)` means the text was empty.
fn create_chapter(
    config: &BuildChaptersConfig,
    text_path: &Path,
    number: u32,
) -> Result<Option<String>> {
    let body = std::fs::read_to_string(text_path).map_err(|e| BookforgeError::read(text_path, e))?;
    if body.trim().is_empty() {
        return Ok(None);
    }

    let stem = file_stem(text_path);
    let title = derive_title(&stem);
    let content = render_chapter(&config.heading, &title, &body);

    let out_name = chapter_file_name(number, &stem, &config.extension);
    let out_path = config.chapters_dir.join(&out_name);
    std::fs::write(&out_path, content).map_err(|e| BookforgeError::write(&out_path, e))?;

    Ok(Some(out_name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
