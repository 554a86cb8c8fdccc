//! Reserved character escaping.

/// Characters escaped by [`escape_reserved`].
pub const RESERVED_CHARS: [char; 2] = ['#', '_'];

/// Prefix every unescaped `#` and `_` with a backslash.
///
/// A reserved character already preceded by `\` is left alone, so applying
/// this twice gives the same result as applying it once.
pub fn escape_reserved(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut prev = None;

    for c in text.chars() {
        if RESERVED_CHARS.contains(&c) && prev != Some('\\') {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
