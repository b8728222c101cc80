//! Scene-heading reconstructor for split `INT./EXT.` prefixes.
//!
//! Some extractors break `INT./EXT. KITCHEN - DAY` after the first period,
//! leaving `INT.` alone on one line and `/EXT. KITCHEN - DAY` on the next.
//! A `/EXT.` line is rewritten to `INT./EXT.` when:
//!
//! - the previous line is exactly `INT.` (the two lines are merged), or
//! - the previous line is blank or the line opens the document, or
//! - the line already reads like a full heading on its own.
//!
//! Other heading malformations are left alone.

use super::patterns::is_blank;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_SPLIT_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/EXT\.\s*[A-Z]").unwrap());

static RE_COMPLETE_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^/EXT\.\s*(?:.+\s-\s(?:DAY|NIGHT|CONTINUOUS|LATER|MOMENTS LATER|DAWN|DUSK)|[A-Z][A-Z0-9 '.\-]*)$",
    )
    .unwrap()
});

const SPLIT_PREFIX: &str = "/EXT.";
const FULL_PREFIX: &str = "INT./EXT.";

fn rewrite_prefix(trimmed: &str) -> String {
    format!("{FULL_PREFIX}{}", &trimmed[SPLIT_PREFIX.len()..])
}

/// Repair `/EXT.` headings whose `INT.` was split off.
pub fn rejoin_split_headings(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut repaired = 0usize;

    for line in lines {
        let trimmed = line.trim();
        if !RE_SPLIT_TAIL.is_match(trimmed) {
            out.push(line);
            continue;
        }

        let prev = out.last().map(|p| p.trim());
        match prev {
            Some("INT.") => {
                let merged = rewrite_prefix(trimmed);
                if let Some(last) = out.last_mut() {
                    *last = merged;
                }
                repaired += 1;
            }
            None => {
                out.push(rewrite_prefix(trimmed));
                repaired += 1;
            }
            Some(p) if is_blank(p) || RE_COMPLETE_TAIL.is_match(trimmed) => {
                out.push(rewrite_prefix(trimmed));
                repaired += 1;
            }
            Some(_) => out.push(line),
        }
    }

    debug!("scene headings: repaired {} split prefixes", repaired);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merges_with_lone_int() {
        let out = rejoin_split_headings(lines(&["INT.", "/EXT. KITCHEN - DAY"]));
        assert_eq!(out, lines(&["INT./EXT. KITCHEN - DAY"]));
    }

    #[test]
    fn test_rewrites_after_blank() {
        let out = rejoin_split_headings(lines(&["", "/EXT. CAR - moving"]));
        assert_eq!(out, lines(&["", "INT./EXT. CAR - moving"]));
    }

    #[test]
    fn test_rewrites_complete_heading_after_text() {
        let out = rejoin_split_headings(lines(&[
            "She runs.",
            "/EXT. PARKING LOT - NIGHT",
            "He follows.",
            "/EXT. GARAGE",
        ]));
        assert_eq!(
            out,
            lines(&[
                "She runs.",
                "INT./EXT. PARKING LOT - NIGHT",
                "He follows.",
                "INT./EXT. GARAGE",
            ])
        );
    }

    #[test]
    fn test_leaves_fragment_after_text() {
        let input = lines(&["She runs.", "/EXT. Garage door slams"]);
        assert_eq!(rejoin_split_headings(input.clone()), input);
    }

    #[test]
    fn test_requires_capital_after_prefix() {
        let input = lines(&["", "/EXT. 12 o'clock"]);
        assert_eq!(rejoin_split_headings(input.clone()), input);
    }

    #[test]
    fn test_start_of_document_counts_as_blank() {
        let out = rejoin_split_headings(lines(&["/EXT. Kitchen"]));
        assert_eq!(out, lines(&["INT./EXT. Kitchen"]));
    }
}
