//! Pipeline stages for PDF-to-Fountain extraction.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ reconstruct
//! (URL/path)  (pdfium)   (heuristic cleanup)
//! ```
//!
//! 1. [`input`]: resolve the user-supplied path or URL to PDF bytes and
//!    reject anything without a `%PDF` signature
//! 2. [`extract`]: group positioned text segments into lines; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`reconstruct`]: rebuild scene headings, cues and dialogue from the
//!    lines; pure and synchronous, usable on its own via
//!    [`reconstruct::clean_screenplay`]

pub mod extract;
pub mod input;
pub mod reconstruct;
