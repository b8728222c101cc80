//! Error types for the pdf2fountain library.
//!
//! [`Pdf2FountainError`] covers every condition that stops a document from
//! being extracted at all: unreadable input, a byte stream pdfium cannot
//! decode, a missing pdfium library, invalid configuration.
//!
//! Pages whose text layer is unreadable are *not* errors. They contribute no
//! lines, get logged at `warn` and are reported to the progress callback, and
//! the extraction still succeeds with degraded content.
//!
//! The public `extract*` entry points never return this type directly; they
//! fold it into [`crate::output::ExtractionResult`] with `success = false`.
//! Use [`crate::convert::try_extract`] when the typed error is needed.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2fountain library.
#[derive(Debug, Error)]
pub enum Pdf2FountainError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is neither a usable file path nor an HTTP/HTTPS URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The input was read, but does not start with the `%PDF` signature.
    #[error("Input is not a valid PDF: '{input}'\nFirst bytes: {magic:?}")]
    NotAPdf { input: String, magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not parse the byte stream (corrupt, truncated, unsupported).
    #[error("PDF '{input}' could not be decoded: {detail}")]
    CorruptPdf { input: String, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{input}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { input: String },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{input}'")]
    WrongPassword { input: String },

    /// The page selection does not intersect the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Text extraction needs the pdfium shared library. You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (file or directory).\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium into a system library path.\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Fountain file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_pdf_display() {
        let e = Pdf2FountainError::CorruptPdf {
            input: "script.pdf".into(),
            detail: "FormatError".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("script.pdf"), "got: {msg}");
        assert!(msg.contains("FormatError"), "got: {msg}");
    }

    #[test]
    fn not_a_pdf_shows_magic() {
        let e = Pdf2FountainError::NotAPdf {
            input: "<memory>".into(),
            magic: b"PK\x03\x04".to_vec(),
        };
        assert!(e.to_string().contains("<memory>"));
        assert!(e.to_string().contains("80, 75"));
    }

    #[test]
    fn page_out_of_range_display() {
        let e = Pdf2FountainError::PageOutOfRange { page: 0, total: 120 };
        assert!(e.to_string().contains("120 pages"));
    }

    #[test]
    fn binding_failure_mentions_env_var() {
        let e = Pdf2FountainError::PdfiumBindingFailed("not found".into());
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
