//! Screenplay reconstruction: turn extracted PDF lines back into Fountain.
//!
//! Layout-driven extraction loses the structure a screenplay carries in its
//! indentation. What survives are weak signals (capitalisation, blank-line
//! adjacency, line length, a handful of fixed markers), and this module
//! rebuilds scene headings, character cues, parentheticals and dialogue from
//! them. It is a best-effort heuristic cleaner tuned for US screenplay
//! conventions, not a parser.
//!
//! ## Stage Order
//!
//! ```text
//! hygiene ──▶ title_page ──▶ noise ──▶ heading ──▶ dialogue ──▶ whitespace
//! ```
//!
//! Each stage takes and returns the whole line sequence. Lines are dropped,
//! blanked, merged or rewritten in place, never reordered.
//!
//! The noise stage blanks rather than deletes so that the dialogue stage
//! still sees the blank-line spacing it needs, and the heading stage runs
//! before dialogue so a repaired heading can end a speech.

pub mod classify;
pub mod dialogue;
pub mod heading;
pub mod noise;
pub mod patterns;
pub mod title_page;
pub mod whitespace;

use tracing::debug;

pub use classify::{classify_lines, LineKind};

/// Reconstruct Fountain text from raw extracted text.
///
/// Pure and synchronous; safe to call from any thread.
pub fn clean_screenplay(raw: &str) -> String {
    let lines = split_lines(raw);
    clean_lines(lines).join("\n")
}

/// Run all reconstruction stages over an already split line sequence.
pub fn clean_lines(lines: Vec<String>) -> Vec<String> {
    let input_len = lines.len();
    let lines = title_page::strip_title_page(lines);
    let lines = noise::strip_structural_noise(lines);
    let lines = heading::rejoin_split_headings(lines);
    let lines = dialogue::merge_dialogue(lines);
    let lines = whitespace::normalise_whitespace(lines);
    debug!("reconstruction: {} → {} lines", input_len, lines.len());
    lines
}

/// Split raw text into lines after normalising line endings and removing
/// invisible characters.
pub fn split_lines(raw: &str) -> Vec<String> {
    let text = remove_invisible_chars(&normalise_line_endings(raw));
    text.split('\n').map(str::to_string).collect()
}

fn normalise_line_endings(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .replace(['\r', '\u{000C}'], "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}
