//! LaTeX chapter markup and filename rules.
//!
//! Everything here is a pure `&str -> String` transform; the batch pipelines in
//! `bookforge-core` handle the filesystem side.

mod escape;
mod include;
mod names;

pub use escape::{RESERVED_CHARS, escape_reserved};
pub use include::{include_line, rewrite_includes};
pub use names::{derive_title, normalized_chapter_name};

// ---------------------------------------------------------------------------
// Chapter templating
// ---------------------------------------------------------------------------

/// Render a chapter file: heading, blank line, trimmed body, trailing blank line.
///
/// The title is used verbatim; reserved characters are handled by a later
/// [`escape_reserved`] pass.
pub fn render_chapter(heading: &str, title: &str, body: &str) -> String {
    format!("\\{heading}{{{title}}}\n\n{}\n\n", body.trim())
}

/// Build the `{NN}-{stem}.{ext}` name of a freshly created chapter file.
pub fn chapter_file_name(number: u32, stem: &str, extension: &str) -> String {
    format!("{number:02}-{stem}.{extension}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
