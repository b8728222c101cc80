//! Whitespace normaliser, the last reconstruction stage.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_INNER_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Longest run of blank lines kept in the output.
const MAX_BLANK_RUN: usize = 2;

/// Keep leading indentation, squeeze inner space/tab runs, drop trailing
/// whitespace.
fn normalise_line(line: &str) -> String {
    let body_start = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    let (indent, body) = line.split_at(body_start);
    let body = RE_INNER_SPACES.replace_all(body.trim_end(), " ");
    if body.is_empty() {
        return String::new();
    }
    format!("{indent}{body}")
}

/// Normalise every line, cap blank runs at two and trim blank lines from
/// both ends of the document.
pub fn normalise_whitespace(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut blank_run = 0usize;

    for line in &lines {
        let line = normalise_line(line);
        if line.is_empty() {
            blank_run += 1;
            if blank_run > MAX_BLANK_RUN || out.is_empty() {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push(line);
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_collapses_inner_runs() {
        assert_eq!(normalise_line("JOHN   walks \t in."), "JOHN walks in.");
    }

    #[test]
    fn test_keeps_indent_verbatim() {
        assert_eq!(normalise_line("\t  (beat)   "), "\t  (beat)");
    }

    #[test]
    fn test_whitespace_only_is_blank() {
        assert_eq!(normalise_line(" \t "), "");
    }

    #[test]
    fn test_caps_blank_runs_at_two() {
        let out = normalise_whitespace(lines(&["A", "", "", "", "", "B", "", "C"]));
        assert_eq!(out, lines(&["A", "", "", "B", "", "C"]));
    }

    #[test]
    fn test_trims_document_edges() {
        let out = normalise_whitespace(lines(&["", "  ", "A", "", ""]));
        assert_eq!(out, lines(&["A"]));
    }

    #[test]
    fn test_all_blank_document() {
        assert!(normalise_whitespace(lines(&["", " ", "\t"])).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let once = normalise_whitespace(lines(&["", "A  b", "", "", "", "  C", ""]));
        assert_eq!(normalise_whitespace(once.clone()), once);
    }
}
