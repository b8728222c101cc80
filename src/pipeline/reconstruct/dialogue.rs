//! Dialogue block merger.
//!
//! PDF layout hard-wraps dialogue at ~35 characters and extraction often adds
//! a blank line between wrapped rows. Fountain, on the other hand, ends a
//! dialogue block at the first blank line. This stage rebuilds each speech as
//! one line by telling wrap artifacts apart from real paragraph breaks.
//!
//! ## State machine
//!
//! ```text
//!            cue after blank / start
//!  Scanning ─────────────────────────▶ InDialogue { blanks, accumulator }
//!     ▲                                   │
//!     │  2nd blank (consumed)             │ 1st blank: swallow
//!     │  scene heading   (reprocessed)    │ parenthetical: emit own line
//!     │  next cue        (reprocessed)    │ continuation: accumulate
//!     └───action line    (reprocessed)────┘
//! ```
//!
//! Every exit flushes the accumulator as one line and emits one blank line.
//! "Reprocessed" exits hand the same line back to `Scanning`. A close on the
//! second blank keeps both blanks unless a heading or cue comes next, so a
//! cleaned document reads back the same on a second pass.

use super::patterns::{
    has_cue_shape, is_blank, is_mixed_case, is_parenthetical, is_scene_heading,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Lines longer than this (in characters) read as action, not dialogue.
const ACTION_MIN_LEN: usize = 45;

static RE_ACTION_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:He|She|They|The|A|An|In|On|At|From|To|With|And|But|It's|It|That|This)\b")
        .unwrap()
});

/// What a line means to an open dialogue block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueSignal {
    /// Blank line: wrap artifact on the first, block end on the second.
    Blank,
    /// A scene heading closes the block and starts a new element.
    SceneHeading,
    /// An all-caps line after a blank: the next speaker.
    NextCue,
    /// `(beat)`-style direction kept on its own line.
    Parenthetical,
    /// Mixed-case narration that cannot belong to the speech.
    Action,
    /// More of the same speech.
    Continuation,
}

/// Decide how `line` affects an open dialogue block.
///
/// Rules are checked in order; the first that fits wins.
pub fn dialogue_signal(line: &str, consecutive_blank_lines: usize, has_text: bool) -> DialogueSignal {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return DialogueSignal::Blank;
    }
    if is_scene_heading(trimmed) {
        return DialogueSignal::SceneHeading;
    }
    if consecutive_blank_lines > 0 && has_cue_shape(trimmed) && !trimmed.starts_with('(') {
        return DialogueSignal::NextCue;
    }
    if is_parenthetical(trimmed) {
        return DialogueSignal::Parenthetical;
    }
    if has_text && looks_like_action(trimmed) {
        return DialogueSignal::Action;
    }
    DialogueSignal::Continuation
}

fn looks_like_action(trimmed: &str) -> bool {
    is_mixed_case(trimmed)
        && (trimmed.chars().count() > ACTION_MIN_LEN || RE_ACTION_OPENER.is_match(trimmed))
}

/// Whether a non-blank line starts a new element on its own.
fn opens_element(trimmed: &str) -> bool {
    is_scene_heading(trimmed) || (has_cue_shape(trimmed) && !trimmed.starts_with('('))
}

/// A character cue can only open a block right after a blank line or at the
/// start of the document.
pub fn is_character_cue(line: &str, preceded_by_blank: bool) -> bool {
    preceded_by_blank && has_cue_shape(line)
}

#[derive(Debug)]
enum MergerState {
    Scanning,
    InDialogue {
        consecutive_blank_lines: usize,
        accumulator: Vec<String>,
    },
}

/// Streams lines through the state machine, collecting the output.
struct DialogueMerger {
    state: MergerState,
    out: Vec<String>,
    blocks: usize,
}

enum Step {
    Consumed,
    Reprocess,
}

impl DialogueMerger {
    fn new(capacity: usize) -> Self {
        Self {
            state: MergerState::Scanning,
            out: Vec::with_capacity(capacity),
            blocks: 0,
        }
    }

    fn feed(&mut self, line: String, preceded_by_blank: bool, element_next: bool) {
        // At most one reprocess per line: an exit always lands in Scanning,
        // which consumes unconditionally.
        if let Step::Reprocess = self.step(&line, element_next) {
            self.scan(line, preceded_by_blank);
        }
    }

    fn step(&mut self, line: &str, element_next: bool) -> Step {
        let MergerState::InDialogue {
            consecutive_blank_lines,
            accumulator,
        } = &mut self.state
        else {
            return Step::Reprocess;
        };

        match dialogue_signal(line, *consecutive_blank_lines, !accumulator.is_empty()) {
            DialogueSignal::Blank => {
                *consecutive_blank_lines += 1;
                if *consecutive_blank_lines >= 2 {
                    self.close_block();
                    if !element_next {
                        self.out.push(String::new());
                    }
                }
                Step::Consumed
            }
            DialogueSignal::SceneHeading | DialogueSignal::NextCue | DialogueSignal::Action => {
                self.close_block();
                Step::Reprocess
            }
            DialogueSignal::Parenthetical => {
                let pending = flush(accumulator);
                *consecutive_blank_lines = 0;
                self.out.extend(pending);
                self.out.push(line.to_string());
                Step::Consumed
            }
            DialogueSignal::Continuation => {
                accumulator.push(line.trim().to_string());
                *consecutive_blank_lines = 0;
                Step::Consumed
            }
        }
    }

    fn scan(&mut self, line: String, preceded_by_blank: bool) {
        if is_character_cue(&line, preceded_by_blank) {
            self.state = MergerState::InDialogue {
                consecutive_blank_lines: 0,
                accumulator: Vec::new(),
            };
            self.blocks += 1;
        }
        self.out.push(line);
    }

    /// Flush the speech, emit the separating blank line, return to scanning.
    fn close_block(&mut self) {
        if let MergerState::InDialogue {
            mut accumulator, ..
        } = std::mem::replace(&mut self.state, MergerState::Scanning)
        {
            self.out.extend(flush(&mut accumulator));
            self.out.push(String::new());
        }
    }

    fn finish(mut self) -> (Vec<String>, usize) {
        if let MergerState::InDialogue { accumulator, .. } = &mut self.state {
            let pending = flush(accumulator);
            self.out.extend(pending);
        }
        (self.out, self.blocks)
    }
}

/// Join accumulated rows into one dialogue line, if there are any.
fn flush(accumulator: &mut Vec<String>) -> Option<String> {
    if accumulator.is_empty() {
        return None;
    }
    let joined = accumulator.join(" ");
    accumulator.clear();
    Some(joined)
}

/// For each line, whether the next non-blank line after it opens a new
/// element. The end of input opens nothing.
fn element_follows(lines: &[String]) -> Vec<bool> {
    let mut flags = vec![false; lines.len()];
    let mut upcoming = false;
    for (i, line) in lines.iter().enumerate().rev() {
        flags[i] = upcoming;
        if !is_blank(line) {
            upcoming = opens_element(line.trim());
        }
    }
    flags
}

/// Merge hard-wrapped dialogue into one line per speech.
pub fn merge_dialogue(lines: Vec<String>) -> Vec<String> {
    let input_len = lines.len();
    let lookahead = element_follows(&lines);
    let mut merger = DialogueMerger::new(input_len);
    let mut preceded_by_blank = true;

    for (line, follows) in lines.into_iter().zip(lookahead) {
        let blank = is_blank(&line);
        merger.feed(line, preceded_by_blank, follows);
        preceded_by_blank = blank;
    }

    let (out, blocks) = merger.finish();
    debug!(
        "dialogue: {} blocks, {} → {} lines",
        blocks,
        input_len,
        out.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    // ── dialogue_signal ──────────────────────────────────────────────────

    #[test]
    fn test_signal_blank() {
        assert_eq!(dialogue_signal("   ", 0, true), DialogueSignal::Blank);
    }

    #[test]
    fn test_signal_scene_heading_beats_everything() {
        assert_eq!(
            dialogue_signal("INT. HOUSE - DAY", 1, true),
            DialogueSignal::SceneHeading
        );
    }

    #[test]
    fn test_signal_next_cue_needs_blank() {
        assert_eq!(dialogue_signal("MARY", 1, true), DialogueSignal::NextCue);
        assert_eq!(dialogue_signal("MARY", 0, true), DialogueSignal::Continuation);
        assert_eq!(dialogue_signal("(BEAT)", 1, true), DialogueSignal::Parenthetical);
    }

    #[test]
    fn test_signal_parenthetical() {
        assert_eq!(
            dialogue_signal("(whispering)", 0, false),
            DialogueSignal::Parenthetical
        );
    }

    #[test]
    fn test_signal_action_requires_text_so_far() {
        assert_eq!(dialogue_signal("He leaves.", 0, true), DialogueSignal::Action);
        assert_eq!(dialogue_signal("He leaves.", 0, false), DialogueSignal::Continuation);
    }

    #[test]
    fn test_signal_action_by_length() {
        let long = "Somewhere far below, the engines turn over and the whole ship shudders.";
        assert_eq!(dialogue_signal(long, 0, true), DialogueSignal::Action);
    }

    #[test]
    fn test_signal_opener_is_whole_word() {
        assert_eq!(dialogue_signal("There you are.", 0, true), DialogueSignal::Continuation);
        assert_eq!(dialogue_signal("Andrew, wait.", 0, true), DialogueSignal::Continuation);
        assert_eq!(dialogue_signal("It's late.", 0, true), DialogueSignal::Action);
    }

    #[test]
    fn test_signal_shouting_is_not_action() {
        assert_eq!(dialogue_signal("THE DOOR! NOW!", 0, true), DialogueSignal::Continuation);
    }

    // ── merge_dialogue ───────────────────────────────────────────────────

    #[test]
    fn test_merges_wrapped_speech() {
        let out = merge_dialogue(lines(&[
            "JOHN", "", "Hello", "there.", "", "", "MARY", "", "Hi John.",
        ]));
        assert_eq!(out, lines(&["JOHN", "Hello there.", "", "MARY", "Hi John."]));
    }

    #[test]
    fn test_parenthetical_kept_on_own_line() {
        let out = merge_dialogue(lines(&["JOHN", "", "(whispering)", "Be quiet."]));
        assert_eq!(out, lines(&["JOHN", "(whispering)", "Be quiet."]));
    }

    #[test]
    fn test_parenthetical_mid_speech_flushes() {
        let out = merge_dialogue(lines(&["JOHN", "I think", "so.", "(beat)", "No."]));
        assert_eq!(out, lines(&["JOHN", "I think so.", "(beat)", "No."]));
    }

    #[test]
    fn test_scene_heading_closes_block_and_is_kept() {
        let out = merge_dialogue(lines(&["JOHN", "", "Run!", "", "EXT. STREET - NIGHT", "Rain."]));
        assert_eq!(
            out,
            lines(&["JOHN", "Run!", "", "EXT. STREET - NIGHT", "Rain."])
        );
    }

    #[test]
    fn test_next_cue_after_single_blank() {
        let out = merge_dialogue(lines(&["JOHN", "Hi.", "", "MARY", "Hey."]));
        assert_eq!(out, lines(&["JOHN", "Hi.", "", "MARY", "Hey."]));
    }

    #[test]
    fn test_action_line_closes_block() {
        let out = merge_dialogue(lines(&["JOHN", "Bye.", "", "He leaves the room."]));
        assert_eq!(out, lines(&["JOHN", "Bye.", "", "He leaves the room."]));
    }

    #[test]
    fn test_cue_requires_preceding_blank() {
        let input = lines(&["John enters.", "JOHN", "Hello", "there."]);
        assert_eq!(merge_dialogue(input.clone()), input);
    }

    #[test]
    fn test_scene_heading_is_never_a_cue() {
        let input = lines(&["INT. HOUSE - DAY", "", "Quiet.", "Very quiet."]);
        assert_eq!(merge_dialogue(input.clone()), input);
    }

    #[test]
    fn test_flush_at_end_of_input() {
        let out = merge_dialogue(lines(&["", "JOHN", "One", "two", ""]));
        assert_eq!(out, lines(&["", "JOHN", "One two"]));
    }

    #[test]
    fn test_cue_followed_by_two_blanks() {
        let input = lines(&["JOHN", "", "", "", "Silence."]);
        assert_eq!(merge_dialogue(input.clone()), input);
    }

    #[test]
    fn test_two_blanks_before_action_are_kept() {
        let out = merge_dialogue(lines(&["JOHN", "Hi.", "", "", "Smiling, she waves."]));
        assert_eq!(out, lines(&["JOHN", "Hi.", "", "", "Smiling, she waves."]));
    }

    #[test]
    fn test_two_blanks_before_cue_collapse_to_one() {
        let out = merge_dialogue(lines(&["JOHN", "Hi.", "", "", "MARY", "Hey."]));
        assert_eq!(out, lines(&["JOHN", "Hi.", "", "MARY", "Hey."]));

        let out = merge_dialogue(lines(&["JOHN", "Hi.", "", "", "INT. HALL - DAY"]));
        assert_eq!(out, lines(&["JOHN", "Hi.", "", "INT. HALL - DAY"]));
    }

    #[test]
    fn test_element_follows_skips_blanks() {
        let flags = element_follows(&lines(&["Hi.", "", "", "MARY", "", "(beat)", "Go."]));
        assert_eq!(flags, vec![true, true, true, false, false, false, false]);
    }

    #[test]
    fn test_rerun_is_stable_after_two_blank_close() {
        for input in [
            lines(&["JOHN", "Hi.", "", "", "Smiling, she waves."]),
            lines(&["BANG!", "", "", "He falls."]),
            lines(&["JOHN", "Wait.", "", "", "(beat)", "Go."]),
        ] {
            let once = merge_dialogue(input);
            let twice = merge_dialogue(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_rerun_is_stable() {
        let once = merge_dialogue(lines(&[
            "JOHN", "", "Hello", "there.", "", "", "MARY", "", "(softly)", "Hi", "John.",
        ]));
        let twice = merge_dialogue(once.clone());
        assert_eq!(once, twice);
    }
}
