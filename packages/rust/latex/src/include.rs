//! Master document `\input{...}` directives.

use tracing::debug;

/// Render the `\input{<include_dir>/<file_name>}` directive for a chapter file.
pub fn include_line(include_dir: &str, file_name: &str) -> String {
    let dir = include_dir.trim_end_matches('/');
    if dir.is_empty() {
        format!("\\input{{{file_name}}}")
    } else {
        format!("\\input{{{dir}/{file_name}}}")
    }
}

/// Rewrite include directives for renamed chapter files.
///
/// For each `(old, new)` pair every exact occurrence of the old directive is
/// replaced with the new one. Returns the new text and the replacement count.
pub fn rewrite_includes<'a, I>(content: &str, include_dir: &str, renames: I) -> (String, usize)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut updated = content.to_string();
    let mut replacements = 0;

    for (old_name, new_name) in renames {
        let old = include_line(include_dir, old_name);
        let new = include_line(include_dir, new_name);

        let hits = updated.matches(&old).count();
        if hits > 0 {
            debug!(%old, %new, hits, "rewriting include");
            updated = updated.replace(&old, &new);
            replacements += hits;
        }
    }

    (updated, replacements)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "\\begin{document}\n\
\\input{chapters/0-sample.tex}\n\
\\input{chapters/1-stories.tex}\n\
\\input{chapters/02-[長文] 標題.tex}\n\
\\end{document}\n";

    #[test]
    fn include_line_formats() {
        assert_eq!(include_line("chapters", "02.tex"), "\\input{chapters/02.tex}");
        assert_eq!(include_line("chapters/", "02.tex"), "\\input{chapters/02.tex}");
        assert_eq!(include_line("", "02.tex"), "\\input{02.tex}");
    }

    #[test]
    fn rewrites_renamed_reference() {
        let (out, n) = rewrite_includes(MASTER, "chapters", [("02-[長文] 標題.tex", "02.tex")]);
        assert_eq!(n, 1);
        assert!(out.contains("\\input{chapters/02.tex}\n"));
        assert!(!out.contains("標題"));
    }

    #[test]
    fn untouched_references_stay_identical() {
        let (out, _) = rewrite_includes(MASTER, "chapters", [("02-[長文] 標題.tex", "02.tex")]);
        assert!(out.contains("\\input{chapters/0-sample.tex}\n"));
        assert!(out.contains("\\input{chapters/1-stories.tex}\n"));
        assert_eq!(out.len(), MASTER.len() - "-[長文] 標題".len());
    }

    #[test]
    fn every_occurrence_replaced() {
        let master = "\\input{chapters/03-a.tex}\n% \\input{chapters/03-a.tex}\n";
        let (out, n) = rewrite_includes(master, "chapters", [("03-a.tex", "03.tex")]);
        assert_eq!(n, 2);
        assert_eq!(out, "\\input{chapters/03.tex}\n% \\input{chapters/03.tex}\n");
    }

    #[test]
    fn non_matching_syntax_left_alone() {
        let master = "\\include{chapters/03-a.tex}\n\\input{03-a.tex}\n";
        let (out, n) = rewrite_includes(master, "chapters", [("03-a.tex", "03.tex")]);
        assert_eq!(n, 0);
        assert_eq!(out, master);
    }

    #[test]
    fn no_renames_is_identity() {
        let (out, n) = rewrite_includes(MASTER, "chapters", std::iter::empty());
        assert_eq!(n, 0);
        assert_eq!(out, MASTER);
    }
}
