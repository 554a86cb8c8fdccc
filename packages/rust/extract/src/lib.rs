//! Paragraph text extraction from `.docx` documents.
//!
//! Reads the document body with `docx-rs`, collects one string per top-level
//! body paragraph (tables are not read), drops blank ones, and joins the rest
//! with a blank line.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use bookforge_shared::{BookforgeError, Result};

/// Separator placed between kept paragraphs.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Extract the plain text of a `.docx` file.
///
/// Fails with [`BookforgeError::EmptyContent`] when every paragraph is blank,
/// so callers can tell "nothing to write" apart from read errors.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn extract_text(path: &Path) -> Result<String> {
    let paragraphs = read_paragraphs(path)?;
    let text = paragraphs_to_text(&paragraphs);

    if text.is_empty() {
        return Err(BookforgeError::EmptyContent {
            path: path.to_path_buf(),
        });
    }

    debug!(paragraphs = paragraphs.len(), chars = text.chars().count(), "extracted text");
    Ok(text)
}

/// Read the top-level paragraphs of the document body in order.
///
/// Paragraphs nested in tables are not part of the body sequence. Blank
/// paragraphs are kept here; [`paragraphs_to_text`] drops them.
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| BookforgeError::read(path, e))?;

    let doc = docx_rs::read_docx(&bytes)
        .map_err(|e| BookforgeError::parse(path, format!("not a readable .docx: {e}")))?;

    let paragraphs = doc
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    Ok(paragraphs)
}

/// Join trimmed, non-blank paragraphs with [`PARAGRAPH_SEPARATOR`].
pub fn paragraphs_to_text<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// Make a document stem safe to use as a filename.
///
/// Replaces each of `<>:"/\|?*` with `_`, collapses whitespace runs to a single
/// space, and trims.
pub fn sanitize_file_stem(stem: &str) -> String {
    static UNSAFE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid regex"));
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    let safe = UNSAFE_RE.replace_all(stem, "_");
    WS_RE.replace_all(&safe, " ").trim().to_string()
}

// ---------------------------------------------------------------------------
// Document walking
// ---------------------------------------------------------------------------

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run(run, &mut text),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = inner {
                        push_run(run, &mut text);
                    }
                }
            }
            _ => {}
        }
    }
    text
}

fn push_run(run: &docx_rs::Run, out: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(t) => out.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => out.push('\t'),
            docx_rs::RunChild::Break(br) if is_line_break(br) => out.push('\n'),
            _ => {}
        }
    }
}

/// Only text-wrapping breaks are line breaks; page and column breaks add no text.
///
/// `docx_rs::Break` keeps its type private, so it is read back from the
/// serialized form.
fn is_line_break(br: &docx_rs::Break) -> bool {
    match serde_json::to_value(br) {
        Ok(value) => {
            let kind = value.to_string();
            !(kind.contains("\"page\"") || kind.contains("\"column\""))
        }
        Err(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use docx_rs::{BreakType, Docx, Paragraph, Run, Table, TableCell, TableRow};

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    fn write_docx(path: &Path, docx: Docx) {
        let file = std::fs::File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    #[test]
    fn paragraphs_to_text_drops_blank() {
        assert_eq!(paragraphs_to_text(&["A", "", "B"]), "A\n\nB");
        assert_eq!(paragraphs_to_text(&["  A  ", " \t ", "B\n"]), "A\n\nB");
    }

    #[test]
    fn paragraphs_to_text_all_blank_is_empty() {
        assert_eq!(paragraphs_to_text(&["", "   "]), "");
        assert_eq!(paragraphs_to_text::<&str>(&[]), "");
    }

    #[test]
    fn sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_file_stem(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_file_stem("  [長文]   (慎入)\tTitle  "), "[長文] (慎入) Title");
    }

    #[test]
    fn extract_text_from_docx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.docx");
        write_docx(
            &path,
            Docx::new()
                .add_paragraph(para("A"))
                .add_paragraph(Paragraph::new())
                .add_paragraph(para("B")),
        );

        assert_eq!(extract_text(&path).unwrap(), "A\n\nB");
    }

    #[test]
    fn read_paragraphs_concatenates_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.docx");
        write_docx(
            &path,
            Docx::new().add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Hello, "))
                    .add_run(Run::new().add_text("world")),
            ),
        );

        let paragraphs = read_paragraphs(&path).unwrap();
        assert_eq!(paragraphs, vec!["Hello, world".to_string()]);
    }

    #[test]
    fn table_paragraphs_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.docx");
        write_docx(
            &path,
            Docx::new()
                .add_paragraph(para("Before"))
                .add_table(Table::new(vec![TableRow::new(vec![
                    TableCell::new().add_paragraph(para("Cell")),
                ])]))
                .add_paragraph(para("After")),
        );

        assert_eq!(extract_text(&path).unwrap(), "Before\n\nAfter");
    }

    #[test]
    fn only_text_wrapping_breaks_become_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("breaks.docx");
        write_docx(
            &path,
            Docx::new()
                .add_paragraph(
                    Paragraph::new().add_run(
                        Run::new()
                            .add_text("line one")
                            .add_break(BreakType::TextWrapping)
                            .add_text("line two"),
                    ),
                )
                .add_paragraph(
                    Paragraph::new().add_run(
                        Run::new()
                            .add_text("page one.")
                            .add_break(BreakType::Page)
                            .add_text("page two.")
                            .add_break(BreakType::Column),
                    ),
                ),
        );

        assert_eq!(
            read_paragraphs(&path).unwrap(),
            vec!["line one\nline two".to_string(), "page one.page two.".to_string()]
        );
    }

    #[test]
    fn blank_document_is_empty_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.docx");
        write_docx(&path, Docx::new().add_paragraph(Paragraph::new()));

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, BookforgeError::EmptyContent { .. }));
    }

    #[test]
    fn garbage_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, BookforgeError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_text(&dir.path().join("missing.docx")).unwrap_err();
        assert!(matches!(err, BookforgeError::Read { .. }));
    }
}
