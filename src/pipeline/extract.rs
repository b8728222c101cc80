//! Text extraction adapter: PDF bytes → ordered text lines via pdfium.
//!
//! pdfium hands out positioned text segments, not lines. Segments whose
//! baselines sit within `line_tolerance` points of the previous segment join
//! the current line; a larger jump starts a new one. Same-line segments are
//! concatenated with a single space unless one side already has whitespace
//! at the seam. Pages are separated by one blank line.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which is not safe to drive
//! from async contexts. All pdfium work happens inside
//! `tokio::task::spawn_blocking`; the grouping logic itself is a pure
//! function ([`assemble_lines`]) with no pdfium types in its signature.

use crate::config::{ExtractionConfig, PageSelection};
use crate::error::Pdf2FountainError;
use crate::output::DocumentMetadata;
use crate::progress::ProgressCallback;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A positioned piece of text as reported by pdfium.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    pub text: String,
    /// Bottom edge of the fragment in PDF points (origin at the page bottom).
    pub baseline_y: f32,
    /// Position of the page in extraction order, starting at 0.
    pub page_index: usize,
}

/// Lines extracted from a document, before reconstruction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
    pub lines: Vec<String>,
    /// Total pages in the document, selected or not.
    pub page_count: usize,
}

impl ExtractedText {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Group fragments of `page_total` pages into lines, in reading order.
///
/// `fragments` must be ordered by `page_index`. Pages without fragments
/// still get their separator, so an empty page shows up as blank lines.
pub fn assemble_lines(fragments: &[RawFragment], page_total: usize, line_tolerance: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut rest = fragments;

    for page in 0..page_total {
        if page > 0 {
            lines.push(String::new());
        }
        let split = rest.partition_point(|f| f.page_index <= page);
        let (on_page, tail) = rest.split_at(split);
        rest = tail;
        lines.extend(group_page(on_page, line_tolerance));
    }

    lines
}

fn group_page(fragments: &[RawFragment], line_tolerance: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_y: Option<f32> = None;

    for frag in fragments.iter().filter(|f| !f.text.is_empty()) {
        match prev_y {
            Some(y) if (frag.baseline_y - y).abs() <= line_tolerance => {
                join_fragment(&mut current, &frag.text);
            }
            Some(_) => {
                lines.push(std::mem::take(&mut current));
                current.push_str(&frag.text);
            }
            None => current.push_str(&frag.text),
        }
        prev_y = Some(frag.baseline_y);
    }

    if prev_y.is_some() {
        lines.push(current);
    }
    lines
}

/// Append `next` to `line`, adding a space only when neither side of the
/// seam is whitespace.
fn join_fragment(line: &mut String, next: &str) {
    let left_ws = line.chars().next_back().is_none_or(char::is_whitespace);
    let right_ws = next.chars().next().is_none_or(char::is_whitespace);
    if !left_ws && !right_ws {
        line.push(' ');
    }
    line.push_str(next);
}

// ── pdfium ───────────────────────────────────────────────────────────────

/// Bind to a pdfium library: `PDFIUM_LIB_PATH` (file or directory), then the
/// working directory, then the system library path.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2FountainError> {
    let from_env = std::env::var("PDFIUM_LIB_PATH")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .map(|p| {
            if p.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&p)
            } else {
                p
            }
        });

    let bindings = match from_env {
        Some(path) => Pdfium::bind_to_library(&path).map_err(|e| {
            Pdf2FountainError::PdfiumBindingFailed(format!("{}: {:?}", path.display(), e))
        })?,
        None => Pdfium::bind_to_library(&Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| Pdf2FountainError::PdfiumBindingFailed(format!("{:?}", e)))?,
    };

    Ok(Pdfium::new(bindings))
}

fn open_document<'a>(
    pdfium: &'a Pdfium,
    bytes: &'a [u8],
    password: Option<&str>,
    label: &str,
) -> Result<PdfDocument<'a>, Pdf2FountainError> {
    pdfium.load_pdf_from_byte_slice(bytes, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Pdf2FountainError::WrongPassword {
                    input: label.to_string(),
                }
            } else {
                Pdf2FountainError::PasswordRequired {
                    input: label.to_string(),
                }
            }
        } else {
            Pdf2FountainError::CorruptPdf {
                input: label.to_string(),
                detail: err_str,
            }
        }
    })
}

/// Extract the selected pages of a PDF as text lines.
///
/// Runs inside `spawn_blocking`.
pub async fn extract_lines(
    bytes: Vec<u8>,
    label: String,
    config: &ExtractionConfig,
) -> Result<ExtractedText, Pdf2FountainError> {
    let tolerance = config.line_tolerance;
    let password = config.password.clone();
    let pages = config.pages.clone();
    let progress = config.progress_callback.clone();

    tokio::task::spawn_blocking(move || {
        extract_lines_blocking(
            &bytes,
            &label,
            tolerance,
            password.as_deref(),
            &pages,
            progress.as_ref(),
        )
    })
    .await
    .map_err(|e| Pdf2FountainError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of text extraction.
fn extract_lines_blocking(
    bytes: &[u8],
    label: &str,
    line_tolerance: f32,
    password: Option<&str>,
    selection: &PageSelection,
    progress: Option<&ProgressCallback>,
) -> Result<ExtractedText, Pdf2FountainError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, bytes, password, label)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let page_indices = selection.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(Pdf2FountainError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }
    let selected = page_indices.len();
    if let Some(cb) = progress {
        cb.on_extraction_start(selected);
    }

    let mut fragments: Vec<RawFragment> = Vec::new();
    for (position, &idx) in page_indices.iter().enumerate() {
        let page_num = idx + 1;
        let frags = match page_fragments(pages, idx, position) {
            Ok(f) => f,
            Err(detail) => {
                warn!("Page {}: no readable text layer ({})", page_num, detail);
                if let Some(cb) = progress {
                    cb.on_page_error(page_num, selected, detail);
                }
                continue;
            }
        };

        if let Some(cb) = progress {
            let line_count = group_page(&frags, line_tolerance).len();
            cb.on_page_extracted(page_num, selected, line_count);
        }
        debug!("Page {} → {} fragments", page_num, frags.len());
        fragments.extend(frags);
    }

    let lines = assemble_lines(&fragments, selected, line_tolerance);
    info!("Extracted {} lines from {} pages", lines.len(), selected);
    if let Some(cb) = progress {
        cb.on_extraction_complete(selected, lines.len());
    }

    Ok(ExtractedText {
        lines,
        page_count: total_pages,
    })
}

/// Read one page's text segments. Errors are returned as text since a bad
/// page degrades the output rather than failing it.
fn page_fragments(
    pages: &PdfPages<'_>,
    idx: usize,
    position: usize,
) -> Result<Vec<RawFragment>, String> {
    let page = pages.get(idx as u16).map_err(|e| format!("{:?}", e))?;
    let text = page.text().map_err(|e| format!("{:?}", e))?;

    let fragments = text
        .segments()
        .iter()
        .map(|segment| RawFragment {
            text: segment.text(),
            baseline_y: segment.bounds().bottom().value,
            page_index: position,
        })
        .collect();
    Ok(fragments)
}

/// Extract document metadata from a PDF without reading any text.
pub async fn extract_metadata(
    bytes: Vec<u8>,
    label: String,
    password: Option<String>,
) -> Result<DocumentMetadata, Pdf2FountainError> {
    tokio::task::spawn_blocking(move || {
        extract_metadata_blocking(&bytes, &label, password.as_deref())
    })
    .await
    .map_err(|e| Pdf2FountainError::Internal(format!("Metadata task panicked: {}", e)))?
}

/// Blocking implementation of metadata extraction.
fn extract_metadata_blocking(
    bytes: &[u8],
    label: &str,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2FountainError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, bytes, password, label)?;

    let metadata = document.metadata();
    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().trim().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}
