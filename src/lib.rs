//! # pdf2fountain
//!
//! Import screenplay PDFs as Fountain text.
//!
//! Layout-driven text extraction flattens a screenplay into a list of
//! lines: dialogue arrives hard-wrapped, every page contributes a number and
//! `(CONTINUED)` markers, and title pages leak author and draft lines. This
//! crate extracts the text with pdfium and then reconstructs the screenplay
//! structure from capitalisation, blank-line spacing and a few fixed
//! patterns.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input        resolve local file or download from URL, sniff %PDF
//!  ├─ 2. Extract      pdfium text segments → lines (spawn_blocking)
//!  ├─ 3. Title page   drop credits and boilerplate before the first scene
//!  ├─ 4. Noise        blank page numbers and CONTINUED markers
//!  ├─ 5. Headings     repair split INT./EXT. prefixes
//!  ├─ 6. Dialogue     merge wrapped speech under its character cue
//!  └─ 7. Whitespace   squeeze spaces, cap blank runs
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2fountain::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let result = extract("script.pdf", &ExtractionConfig::default()).await;
//!     if result.success {
//!         println!("{}", result.text);
//!         eprintln!("{} pages", result.page_count);
//!     } else {
//!         eprintln!("import failed: {}", result.error.unwrap_or_default());
//!     }
//! }
//! ```
//!
//! Text that was already extracted elsewhere can go straight to the cleaner:
//!
//! ```rust
//! let fountain = pdf2fountain::clean_screenplay("JOHN\nHello\nthere.");
//! assert_eq!(fountain, "JOHN\nHello there.");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2fountain` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! ## pdfium
//!
//! PDF decoding needs the pdfium shared library at runtime. It is looked up
//! in `PDFIUM_LIB_PATH`, then the working directory, then the system library
//! path. The cleaner ([`clean_screenplay`]) does not need it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, PageSelection};
pub use convert::{
    extract, extract_from_bytes, extract_many, extract_sync, extract_to_file, inspect,
    try_extract, try_extract_from_bytes, write_atomic,
};
pub use error::Pdf2FountainError;
pub use output::{DocumentMetadata, ExtractionResult, Screenplay};
pub use pipeline::input::{is_pdf_bytes, is_pdf_file};
pub use pipeline::reconstruct::{classify_lines, clean_screenplay, LineKind};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
