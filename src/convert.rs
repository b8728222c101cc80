//! Extraction entry points.
//!
//! Every `extract*` function returns an [`ExtractionResult`] and never an
//! error: a document that cannot be read comes back with `success = false`
//! and a message, so importers can fall back to manual entry. The `try_*`
//! variants expose the typed [`Pdf2FountainError`] for Rust callers that
//! want to match on it.

use crate::config::ExtractionConfig;
use crate::error::Pdf2FountainError;
use crate::output::{DocumentMetadata, ExtractionResult, Screenplay};
use crate::pipeline::extract::{self, ExtractedText};
use crate::pipeline::{input, reconstruct};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract a screenplay from a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Example
/// ```rust,no_run
/// use pdf2fountain::{extract, ExtractionConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let result = extract("script.pdf", &ExtractionConfig::default()).await;
/// if result.success {
///     println!("{}", result.text);
/// } else {
///     eprintln!("{}", result.error.unwrap_or_default());
/// }
/// # }
/// ```
pub async fn extract(input_str: impl AsRef<str>, config: &ExtractionConfig) -> ExtractionResult {
    try_extract(input_str, config).await.into()
}

/// Like [`extract`], returning the typed error on failure.
pub async fn try_extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<Screenplay, Pdf2FountainError> {
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    run(resolved.bytes, resolved.label, config).await
}

/// Extract a screenplay from PDF bytes already in memory.
pub async fn extract_from_bytes(bytes: &[u8], config: &ExtractionConfig) -> ExtractionResult {
    try_extract_from_bytes(bytes, config).await.into()
}

/// Like [`extract_from_bytes`], returning the typed error on failure.
pub async fn try_extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<Screenplay, Pdf2FountainError> {
    let label = "<memory>".to_string();
    input::ensure_pdf(bytes, &label)?;
    run(bytes.to_vec(), label, config).await
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally, so it must not be called
/// from inside an async context.
pub fn extract_sync(input_str: impl AsRef<str>, config: &ExtractionConfig) -> ExtractionResult {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(extract(input_str, config)),
        Err(e) => ExtractionResult::failure(
            Pdf2FountainError::Internal(format!("Failed to create tokio runtime: {}", e))
                .to_string(),
        ),
    }
}

/// Extract a screenplay and write its text to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<Screenplay, Pdf2FountainError> {
    let screenplay = try_extract(input_str, config).await?;
    write_atomic(output_path.as_ref(), &screenplay.text).await?;
    Ok(screenplay)
}

/// Extract several documents, at most `config.concurrency` at a time.
///
/// Results are returned in input order, one per input.
pub async fn extract_many<S: AsRef<str>>(
    inputs: &[S],
    config: &ExtractionConfig,
) -> Vec<ExtractionResult> {
    let mut results: Vec<(usize, ExtractionResult)> =
        stream::iter(inputs.iter().enumerate().map(|(i, input_str)| async move {
            let result = extract(input_str.as_ref(), config).await;
            if let Some(ref e) = result.error {
                warn!("{} failed: {}", input_str.as_ref(), e);
            }
            (i, result)
        }))
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    results.sort_by_key(|(i, _)| *i);
    results.into_iter().map(|(_, r)| r).collect()
}

/// Read PDF metadata without extracting any text.
pub async fn inspect(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<DocumentMetadata, Pdf2FountainError> {
    let resolved = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    extract::extract_metadata(resolved.bytes, resolved.label, config.password.clone()).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Extract lines, then reconstruct them unless disabled.
async fn run(
    bytes: Vec<u8>,
    label: String,
    config: &ExtractionConfig,
) -> Result<Screenplay, Pdf2FountainError> {
    let start = Instant::now();
    let extracted = extract::extract_lines(bytes, label.clone(), config).await?;
    let screenplay = finish(extracted, config.reconstruct);

    info!(
        "Extraction complete: {} ({} pages, {} bytes of text, {}ms)",
        label,
        screenplay.page_count,
        screenplay.text.len(),
        start.elapsed().as_millis()
    );
    Ok(screenplay)
}

fn finish(extracted: ExtractedText, rebuild: bool) -> Screenplay {
    let raw = extracted.text();
    let text = if rebuild {
        reconstruct::clean_screenplay(&raw)
    } else {
        debug!("Reconstruction disabled, returning raw lines");
        raw
    };
    Screenplay {
        text,
        page_count: extracted.page_count,
    }
}

/// Write `contents` to `path` through a sibling temp file and a rename, so
/// readers never see a partial file. Missing parent directories are created.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<(), Pdf2FountainError> {
    let write_err = |e| Pdf2FountainError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or(path.as_os_str()).to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    tokio::fs::write(&tmp_path, contents).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}
