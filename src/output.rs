//! Output types.
//!
//! [`ExtractionResult`] is the one value handed back to callers that import
//! screenplays: cleaned text, page count, and a success flag with an error
//! message instead of a propagated error. [`Screenplay`] is its typed,
//! success-only counterpart returned by [`crate::convert::try_extract`].

use crate::error::Pdf2FountainError;
use serde::{Deserialize, Serialize};

/// Outcome of extracting one PDF.
///
/// Immutable once built. On failure `text` is empty, `page_count` is 0 and
/// `error` carries the message callers should surface before falling back to
/// manual entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Fountain-style text, lines joined by `\n`.
    pub text: String,
    /// Number of pages in the source document.
    pub page_count: usize,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn ok(text: String, page_count: usize) -> Self {
        Self {
            text,
            page_count,
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            page_count: 0,
            success: false,
            error: Some(error.into()),
        }
    }
}

impl From<Result<Screenplay, Pdf2FountainError>> for ExtractionResult {
    fn from(result: Result<Screenplay, Pdf2FountainError>) -> Self {
        match result {
            Ok(screenplay) => Self::ok(screenplay.text, screenplay.page_count),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// A successfully extracted (and, unless disabled, reconstructed) screenplay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenplay {
    pub text: String,
    pub page_count: usize,
}

/// Metadata extracted from the PDF document info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}
