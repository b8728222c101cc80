//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events while the adapter walks the document's pages.
//!
//! Extraction runs on a blocking worker thread (pdfium is not async-safe), so
//! callbacks fire from that thread, and with [`crate::convert::extract_many`]
//! several documents may report at once.
//!
//! # Example
//!
//! ```rust
//! use pdf2fountain::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct LineCounter {
//!     lines: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for LineCounter {
//!     fn on_page_extracted(&self, page_num: usize, total_pages: usize, line_count: usize) {
//!         self.lines.fetch_add(line_count, Ordering::SeqCst);
//!         eprintln!("page {page_num}/{total_pages}: {line_count} lines");
//!     }
//! }
//!
//! let counter = Arc::new(LineCounter { lines: AtomicUsize::new(0) });
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction adapter as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once the document is open, before any page is read.
    ///
    /// `total_pages` is the number of *selected* pages.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page's text fragments have been grouped into lines.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number in the document
    /// * `total_pages`: number of selected pages
    /// * `line_count`: lines produced for this page
    fn on_page_extracted(&self, page_num: usize, total_pages: usize, line_count: usize) {
        let _ = (page_num, total_pages, line_count);
    }

    /// Called when a page's text layer could not be read.
    ///
    /// The page contributes no lines; extraction continues.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: String) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after the last selected page.
    fn on_extraction_complete(&self, total_pages: usize, line_count: usize) {
        let _ = (total_pages, line_count);
    }
}

/// Shared handle stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

/// A callback that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ExtractionProgressCallback for Recorder {
        fn on_page_extracted(&self, page_num: usize, _total: usize, line_count: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("page {page_num}: {line_count}"));
        }
    }

    #[test]
    fn test_defaults_are_noops() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(3);
        cb.on_page_extracted(1, 3, 40);
        cb.on_page_error(2, 3, "bad text layer".into());
        cb.on_extraction_complete(3, 80);
    }

    #[test]
    fn test_partial_override_through_arc() {
        let rec = Arc::new(Recorder::default());
        let cb: ProgressCallback = rec.clone();
        cb.on_extraction_start(2);
        cb.on_page_extracted(1, 2, 55);
        cb.on_page_error(2, 2, "x".into());
        assert_eq!(*rec.events.lock().unwrap(), vec!["page 1: 55".to_string()]);
    }
}
