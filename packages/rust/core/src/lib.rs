//! Batch pipelines for Bookforge.
//!
//! Each pass enumerates one directory, transforms every file independently,
//! and reports per-item outcomes through a [`progress::ProgressReporter`].
//! A failing item is logged and skipped; only an unreadable input directory
//! aborts a run.

pub mod chapters;
pub mod escape;
pub mod extract;
mod fs;
pub mod progress;
pub mod renumber;
