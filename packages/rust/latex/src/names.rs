//! Title and filename derivation.

use std::sync::LazyLock;

use regex::Regex;

/// Derive a chapter title from a text file stem.
///
/// Strips one leading `[...]` group, then one leading `(...)` group (each with
/// trailing whitespace), then trims.
pub fn derive_title(stem: &str) -> String {
    static BRACKET_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\[.*?\]\s*").expect("valid regex"));
    static PAREN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\(.*?\)\s*").expect("valid regex"));

    let title = BRACKET_RE.replace(stem, "");
    let title = PAREN_RE.replace(&title, "");
    title.trim().to_string()
}

/// Canonical name for a chapter file during renumbering.
///
/// A stem with leading ASCII digits becomes `<digits>.<ext>` (digits kept
/// verbatim, so `02-intro.tex` -> `02.tex`). Anything else has each character
/// outside `[A-Za-z0-9.-]` replaced by `_`.
pub fn normalized_chapter_name(file_name: &str, extension: &str) -> String {
    static LEADING_DIGITS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[0-9]+").expect("valid regex"));

    let suffix = format!(".{extension}");
    let stem = file_name.strip_suffix(&suffix).unwrap_or(file_name);

    if let Some(digits) = LEADING_DIGITS_RE.find(stem) {
        return format!("{}{suffix}", digits.as_str());
    }

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{cleaned}{suffix}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
