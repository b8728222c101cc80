//! Per-line classification of a screenplay text.
//!
//! The reconstruction stages never store a classification; each one derives
//! what it needs locally. [`classify_lines`] exposes the same reasoning as a
//! labelled view for inspection and debugging (`pdf2fountain --annotate`).
//! Context is limited to what the stages themselves use: the line, whether
//! the previous line is blank, the first-scene flag, and whether a dialogue
//! block is open.

use super::dialogue::is_character_cue;
use super::patterns::{
    is_blank, is_continued_marker, is_page_number, is_parenthetical, is_scene_heading,
    FirstSceneFlag,
};
use super::title_page::is_title_page_noise;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a single line in a screenplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    TitlePageNoise,
    PageNumber,
    ContinuedMarker,
    SceneHeading,
    CharacterCue,
    Parenthetical,
    Dialogue,
    Action,
    Blank,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::TitlePageNoise => "title-page",
            LineKind::PageNumber => "page-number",
            LineKind::ContinuedMarker => "continued",
            LineKind::SceneHeading => "scene-heading",
            LineKind::CharacterCue => "character",
            LineKind::Parenthetical => "parenthetical",
            LineKind::Dialogue => "dialogue",
            LineKind::Action => "action",
            LineKind::Blank => "blank",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label every line. Output has the same length and order as `lines`.
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Vec<LineKind> {
    let mut flag = FirstSceneFlag::default();
    let mut preceded_by_blank = true;
    let mut in_dialogue = false;

    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            let in_body = flag.observe(line);
            let kind = if is_blank(line) {
                LineKind::Blank
            } else if is_scene_heading(line) {
                LineKind::SceneHeading
            } else if is_page_number(line) {
                LineKind::PageNumber
            } else if is_continued_marker(line) {
                LineKind::ContinuedMarker
            } else if !in_body && is_title_page_noise(line) {
                LineKind::TitlePageNoise
            } else if in_dialogue && is_parenthetical(line) {
                LineKind::Parenthetical
            } else if is_character_cue(line, preceded_by_blank) {
                LineKind::CharacterCue
            } else if in_dialogue {
                LineKind::Dialogue
            } else {
                LineKind::Action
            };

            in_dialogue = matches!(
                kind,
                LineKind::CharacterCue | LineKind::Parenthetical | LineKind::Dialogue
            );
            preceded_by_blank = kind == LineKind::Blank;
            kind
        })
        .collect()
}
