//! `extract` pass: `.docx` documents → plain-text files.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use bookforge_extract::{extract_text, sanitize_file_stem};
use bookforge_shared::{AppConfig, BookforgeError, OutcomeCounts, Result};

use crate::fs::{file_name, file_stem, list_files};
use crate::progress::{ItemEvent, ProgressReporter, Tally};

/// Extension of source documents.
pub const SOURCE_EXTENSION: &str = "docx";

/// Extension of extracted text files.
pub const TEXT_EXTENSION: &str = "txt";

/// Configuration for the `extract` pass.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Directory holding `.docx` documents.
    pub source_dir: PathBuf,
    /// Directory receiving `.txt` files (created if missing).
    pub text_dir: PathBuf,
}

impl From<&AppConfig> for ExtractConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            source_dir: config.paths.source_dir.clone(),
            text_dir: config.paths.text_dir.clone(),
        }
    }
}

/// Result of the `extract` pass.
///
/// `counts.succeeded` are processed documents, `counts.skipped` are documents
/// with no text, and `counts.failed` covers read, parse, and write errors.
#[derive(Debug, Serialize)]
pub struct ExtractResult {
    pub counts: OutcomeCounts,
    /// Text files written, in processing order.
    pub written: Vec<PathBuf>,
    pub text_dir: PathBuf,
    pub elapsed: Duration,
}

/// Extract every document in `source_dir` into `text_dir`.
#[instrument(skip_all, fields(source = %config.source_dir.display(), out = %config.text_dir.display()))]
pub fn extract_documents(
    config: &ExtractConfig,
    progress: &dyn ProgressReporter,
) -> Result<ExtractResult> {
    let start = Instant::now();
    let documents = list_files(&config.source_dir, SOURCE_EXTENSION)?;

    std::fs::create_dir_all(&config.text_dir)
        .map_err(|e| BookforgeError::write(&config.text_dir, e))?;

    info!(count = documents.len(), "extracting text from documents");
    progress.phase("Extracting text", documents.len());

    let mut tally = Tally::new(progress);
    let mut written = Vec::new();

    for path in &documents {
        let name = file_name(path);
        tally.report(ItemEvent::Started { name: &name });

        let outcome = extract_text(path).and_then(|text| {
            let out_name = format!("{}.{TEXT_EXTENSION}", sanitize_file_stem(&file_stem(path)));
            let out_path = config.text_dir.join(&out_name);
            std::fs::write(&out_path, text).map_err(|e| BookforgeError::write(&out_path, e))?;
            Ok((out_name, out_path))
        });

        match outcome {
            Ok((out_name, out_path)) => {
                debug!(document = %name, output = %out_name, "saved text");
                tally.report(ItemEvent::Succeeded {
                    name: &name,
                    output: &out_name,
                });
                written.push(out_path);
            }
            Err(BookforgeError::EmptyContent { .. }) => {
                warn!(document = %name, "document has no text, skipping");
                tally.report(ItemEvent::Skipped {
                    name: &name,
                    reason: "no non-empty paragraphs",
                });
            }
            Err(e) => {
                warn!(document = %name, error = %e, "extraction failed, skipping document");
                tally.report(ItemEvent::Failed {
                    name: &name,
                    error: &e,
                });
            }
        }
    }

    let counts = tally.finish();
    info!(
        processed = counts.succeeded,
        empty = counts.skipped,
        failed = counts.failed,
        "extraction complete"
    );

    Ok(ExtractResult {
        counts,
        written,
        text_dir: config.text_dir.clone(),
        elapsed: start.elapsed(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
