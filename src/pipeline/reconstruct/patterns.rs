//! Line predicates shared by several reconstruction stages.
//!
//! ## Scene-heading prefixes
//!
//! Heading detection is one ordered table, evaluated top to bottom.
//! Compound forms (`INT./EXT`, `I./E`, `INT/EXT`, `I/E`) sit above the plain
//! ones. Every stage that asks "is this a scene heading?" goes through
//! [`is_scene_heading`], so the table lives in one place.

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix patterns in evaluation order. Each must be followed by `.` or
/// whitespace to count.
const SCENE_PREFIXES: &[&str] = &[
    r"INT\./EXT",
    r"I\./E",
    r"INT\.?/EXT",
    r"I/E",
    r"EST",
    r"INT",
    r"EXT",
];

static SCENE_HEADING_TABLE: Lazy<Vec<Regex>> = Lazy::new(|| {
    SCENE_PREFIXES
        .iter()
        .map(|pattern| Regex::new(&format!(r"^{pattern}(?:\.|\s)")).unwrap())
        .collect()
});

/// True when `line`, ignoring surrounding whitespace, opens with a known
/// scene-heading prefix.
pub fn is_scene_heading(line: &str) -> bool {
    let trimmed = line.trim();
    SCENE_HEADING_TABLE.iter().any(|re| re.is_match(trimmed))
}

/// Tracks whether the first scene heading has been seen.
///
/// Monotonic: once set it never clears.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstSceneFlag(bool);

impl FirstSceneFlag {
    /// Feed the next line; returns the flag value *after* the line.
    pub fn observe(&mut self, line: &str) -> bool {
        if !self.0 && is_scene_heading(line) {
            self.0 = true;
        }
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0
    }
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Upper-case with at least one letter, so punctuation-only lines like `--`
/// or `* * *` don't count.
pub fn is_all_caps(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && line == line.to_uppercase()
}

/// Contains lower-case text.
pub fn is_mixed_case(line: &str) -> bool {
    line != line.to_uppercase()
}

/// An all-caps line of 2–50 characters that is not a scene heading: the
/// shape of a character cue, regardless of context.
pub fn has_cue_shape(line: &str) -> bool {
    let trimmed = line.trim();
    let len = trimmed.chars().count();
    (2..=50).contains(&len) && is_all_caps(trimmed) && !is_scene_heading(trimmed)
}

static RE_PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\([^()]*\)$").unwrap());

/// A single parenthesised direction such as `(whispering)`.
pub fn is_parenthetical(line: &str) -> bool {
    RE_PARENTHETICAL.is_match(line.trim())
}

static RE_PAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?$").unwrap());

/// Only digits, with an optional trailing period.
pub fn is_page_number(line: &str) -> bool {
    RE_PAGE_NUMBER.is_match(line.trim())
}

static RE_CONTINUED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\(?\s*(?:continued|cont['’]d)\s*\)?\s*[:.]?(?:\s*\(\d+\))?$").unwrap()
});

/// `(CONTINUED)`, `CONTINUED:`, `CONT'D.` and similar page-break markers.
pub fn is_continued_marker(line: &str) -> bool {
    RE_CONTINUED.is_match(line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_prefixes() {
        for line in [
            "INT./EXT. CAR - MOVING - NIGHT",
            "INT/EXT CAR - NIGHT",
            "INT.EXT. CAR - NIGHT",
            "I/E PORCH - DAY",
            "I./E. PORCH - DAY",
        ] {
            assert!(is_scene_heading(line), "should match: {line}");
        }
    }

    #[test]
    fn test_plain_prefixes() {
        for line in [
            "INT. KITCHEN - DAY",
            "EXT PARK - NIGHT",
            "EST. CITY - DAWN",
            "  INT. HALL",
            "INT.",
        ] {
            assert!(is_scene_heading(line), "should match: {line}");
        }
    }

    #[test]
    fn test_prefix_needs_separator() {
        assert!(!is_scene_heading("INTERIOR DESIGNER"));
        assert!(!is_scene_heading("EXTRA"));
        assert!(!is_scene_heading("ESTHER"));
        assert!(!is_scene_heading("INT"));
        assert!(!is_scene_heading("/EXT. KITCHEN - DAY"));
    }

    #[test]
    fn test_first_scene_flag_is_monotonic() {
        let mut flag = FirstSceneFlag::default();
        assert!(!flag.observe("WRITTEN BY"));
        assert!(flag.observe("INT. HOUSE - DAY"));
        assert!(flag.observe(""));
        assert!(flag.observe("JANE DOE"));
        assert!(flag.is_set());
    }

    #[test]
    fn test_cue_shape() {
        assert!(has_cue_shape("JOHN"));
        assert!(has_cue_shape("MARY (V.O.)"));
        assert!(has_cue_shape("JOHN (CONT'D)"));
        assert!(!has_cue_shape("J"));
        assert!(!has_cue_shape("John"));
        assert!(!has_cue_shape("--"));
        assert!(!has_cue_shape("INT. HOUSE - DAY"));
        assert!(!has_cue_shape(&"A".repeat(51)));
    }

    #[test]
    fn test_parenthetical() {
        assert!(is_parenthetical("(whispering)"));
        assert!(is_parenthetical("  (beat)  "));
        assert!(!is_parenthetical("(one) and (two)"));
        assert!(!is_parenthetical("(unfinished"));
    }

    #[test]
    fn test_page_number() {
        assert!(is_page_number("42."));
        assert!(is_page_number("  7 "));
        assert!(!is_page_number("42A."));
        assert!(!is_page_number("4.2"));
        assert!(!is_page_number(""));
    }

    #[test]
    fn test_continued_marker() {
        for line in [
            "(CONTINUED)",
            "CONTINUED:",
            "continued",
            "CONT'D.",
            "(CONT’D)",
            "CONTINUED: (2)",
        ] {
            assert!(is_continued_marker(line), "should match: {line}");
        }
        assert!(!is_continued_marker("JOHN (CONT'D)"));
        assert!(!is_continued_marker("The story continued."));
    }
}
