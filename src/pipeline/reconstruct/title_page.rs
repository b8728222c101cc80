//! Title-page filter: drop byline and draft boilerplate before the first scene.
//!
//! Everything up to the first scene heading is title page, cover letter or
//! copyright notice. Lines matching the patterns below are removed outright
//! (not blanked). Once a heading has been seen the filter is off for good,
//! so a character called `JANE DOE` or a line reading `Written by hand.` in
//! the body is never touched.

use super::patterns::{is_all_caps, is_scene_heading, FirstSceneFlag};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:by|(?:written by|early draft|draft date|for educational purposes only)\b.*|(?:copyright|©|\(c\)).*)$",
    )
    .unwrap()
});

static RE_LEADING_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}\b").unwrap());

static RE_SPLIT_HEADING_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/EXT\.").unwrap());

/// Whether `line` is title-page noise, judged in isolation.
///
/// Callers must only apply this before the first scene heading.
pub fn is_title_page_noise(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if RE_BOILERPLATE.is_match(trimmed) {
        return true;
    }
    let len = trimmed.chars().count();
    if len < 50 && RE_LEADING_YEAR.is_match(trimmed) {
        return true;
    }
    looks_like_author_name(trimmed, len)
}

/// Short all-caps run of two to four words: author names, the title itself,
/// agency names. `/EXT.` fragments are left for the heading reconstructor.
fn looks_like_author_name(trimmed: &str, len: usize) -> bool {
    let words = trimmed.split_whitespace().count();
    len < 50
        && (2..=4).contains(&words)
        && is_all_caps(trimmed)
        && !is_scene_heading(trimmed)
        && !RE_SPLIT_HEADING_TAIL.is_match(trimmed)
}

/// Remove title-page noise preceding the first scene heading.
pub fn strip_title_page(lines: Vec<String>) -> Vec<String> {
    let before = lines.len();
    let mut flag = FirstSceneFlag::default();
    let kept: Vec<String> = lines
        .into_iter()
        .filter(|line| flag.observe(line) || !is_title_page_noise(line))
        .collect();
    debug!(
        "title page: dropped {} of {} lines (first scene found: {})",
        before - kept.len(),
        before,
        flag.is_set()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_boilerplate_patterns() {
        for line in [
            "by",
            "BY",
            "Written by",
            "WRITTEN BY",
            "Written by Jane Doe",
            "Early Draft",
            "Draft Date: 3/4/21",
            "FOR EDUCATIONAL PURPOSES ONLY",
            "Copyright 2019 Big Studio",
            "© 2020",
        ] {
            assert!(is_title_page_noise(line), "should drop: {line}");
        }
    }

    #[test]
    fn test_year_lines() {
        assert!(is_title_page_noise("2024"));
        assert!(is_title_page_noise("1999 Revised"));
        assert!(!is_title_page_noise("12345 Main Street"));
        assert!(!is_title_page_noise(
            "1984 was the year the whole town seemed to fall asleep at once"
        ));
    }

    #[test]
    fn test_author_name_heuristic() {
        assert!(is_title_page_noise("JANE DOE"));
        assert!(is_title_page_noise("THE LONG NIGHT"));
        assert!(!is_title_page_noise("JANE"));
        assert!(!is_title_page_noise("THE VERY LONG NIGHT OF ALL"));
        assert!(!is_title_page_noise("Jane Doe"));
        assert!(!is_title_page_noise("INT. HOUSE - DAY"));
        assert!(!is_title_page_noise("/EXT. KITCHEN - DAY"));
    }

    #[test]
    fn test_mixed_case_prose_survives() {
        assert!(!is_title_page_noise("Based on the novel by Someone"));
        assert!(!is_title_page_noise(""));
        assert!(!is_title_page_noise("Bye"));
    }

    #[test]
    fn test_strip_stops_at_first_heading() {
        let input = lines(&[
            "THE LONG NIGHT",
            "Written by",
            "JANE DOE",
            "2024",
            "",
            "INT. HOUSE - DAY",
            "",
            "WRITTEN BY",
            "JANE DOE",
            "2024",
        ]);
        let out = strip_title_page(input);
        assert_eq!(
            out,
            lines(&["", "INT. HOUSE - DAY", "", "WRITTEN BY", "JANE DOE", "2024"])
        );
    }

    #[test]
    fn test_no_heading_filters_whole_document() {
        let out = strip_title_page(lines(&["JOHN", "", "Hello", "BIG SHOT"]));
        assert_eq!(out, lines(&["JOHN", "", "Hello"]));
    }
}
