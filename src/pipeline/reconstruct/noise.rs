//! Structural noise stripper: page numbers, CONTINUED markers, running headers.
//!
//! Matching lines are replaced by a blank line, never removed. The dialogue
//! merger counts blank lines to tell a wrapped paragraph from a real break,
//! and deleting a page number would glue the lines around it together.

use super::patterns::{is_continued_marker, is_page_number, FirstSceneFlag};
use tracing::debug;

/// Header/footer literals blanked only before the first scene heading.
/// Compared case-insensitively against the trimmed line.
const TITLE_PAGE_LITERALS: &[&str] = &[
    "shooting script",
    "final draft",
    "first draft",
    "second draft",
    "revised draft",
    "production draft",
    "revisions",
    "screenplay",
    "original screenplay",
    "teleplay",
];

fn is_title_page_literal(line: &str) -> bool {
    let trimmed = line.trim();
    TITLE_PAGE_LITERALS
        .iter()
        .any(|lit| trimmed.eq_ignore_ascii_case(lit))
}

/// Blank page numbers and CONTINUED markers anywhere, and known running
/// header literals before the first scene.
pub fn strip_structural_noise(lines: Vec<String>) -> Vec<String> {
    let mut flag = FirstSceneFlag::default();
    let mut blanked = 0usize;
    let out: Vec<String> = lines
        .into_iter()
        .map(|line| {
            let in_body = flag.observe(&line);
            let noise = is_page_number(&line)
                || is_continued_marker(&line)
                || (!in_body && is_title_page_literal(&line));
            if noise {
                blanked += 1;
                String::new()
            } else {
                line
            }
        })
        .collect();
    debug!("structural noise: blanked {} lines", blanked);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_page_number_becomes_blank() {
        let out = strip_structural_noise(lines(&["EXT. PARK - DAY", "42.", "John walks."]));
        assert_eq!(out, lines(&["EXT. PARK - DAY", "", "John walks."]));
    }

    #[test]
    fn test_continued_markers_blanked_everywhere() {
        let out = strip_structural_noise(lines(&[
            "(CONTINUED)",
            "INT. HOUSE - DAY",
            "CONTINUED:",
            "John sits.",
            "CONT'D.",
        ]));
        assert_eq!(out, lines(&["", "INT. HOUSE - DAY", "", "John sits.", ""]));
    }

    #[test]
    fn test_literals_only_before_first_scene() {
        let out = strip_structural_noise(lines(&[
            "Shooting Script",
            "INT. HOUSE - DAY",
            "Shooting Script",
        ]));
        assert_eq!(out, lines(&["", "INT. HOUSE - DAY", "Shooting Script"]));
    }

    #[test]
    fn test_line_count_preserved() {
        let input = lines(&["1.", "2", "(CONTINUED)", "Hello"]);
        assert_eq!(strip_structural_noise(input.clone()).len(), input.len());
    }

    #[test]
    fn test_numbers_inside_text_untouched() {
        let out = strip_structural_noise(lines(&["INT. ROOM 42 - DAY", "42 seconds left."]));
        assert_eq!(out, lines(&["INT. ROOM 42 - DAY", "42 seconds left."]));
    }
}
