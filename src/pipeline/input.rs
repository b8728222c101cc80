//! Input resolution: turn a user-supplied path or URL into PDF bytes.
//!
//! pdfium loads documents from a byte slice, so both local files and URL
//! downloads end up as an in-memory `Vec<u8>`. The `%PDF` signature is
//! checked before pdfium ever sees the bytes, giving callers a clear
//! `NotAPdf` error instead of a decoder failure.

use crate::error::Pdf2FountainError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// PDF bytes together with a label for error messages and logs.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    /// File path or URL the bytes came from, or `<memory>`.
    pub label: String,
    pub bytes: Vec<u8>,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Whether `bytes` starts with the PDF signature.
pub fn is_pdf_bytes(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Whether the file at `path` starts with the PDF signature.
///
/// Unreadable or short files are not PDFs.
pub fn is_pdf_file(path: impl AsRef<Path>) -> bool {
    let mut magic = [0u8; 4];
    std::fs::File::open(path.as_ref())
        .and_then(|mut f| f.read_exact(&mut magic))
        .map(|_| &magic == PDF_MAGIC)
        .unwrap_or(false)
}

/// Reject bytes without the PDF signature.
pub fn ensure_pdf(bytes: &[u8], label: &str) -> Result<(), Pdf2FountainError> {
    if is_pdf_bytes(bytes) {
        Ok(())
    } else {
        Err(Pdf2FountainError::NotAPdf {
            input: label.to_string(),
            magic: bytes.iter().take(PDF_MAGIC.len()).copied().collect(),
        })
    }
}

/// Resolve the input string to PDF bytes.
///
/// If the input is a URL, download it. Otherwise read the local file.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, Pdf2FountainError> {
    if input.trim().is_empty() {
        return Err(Pdf2FountainError::InvalidInput {
            input: input.to_string(),
        });
    }
    let resolved = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };
    ensure_pdf(&resolved.bytes, &resolved.label)?;
    Ok(resolved)
}

/// Read a local file, mapping I/O failures to input errors.
async fn read_local(path_str: &str) -> Result<ResolvedInput, Pdf2FountainError> {
    let path = PathBuf::from(path_str);

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Pdf2FountainError::PermissionDenied {
            path: path.clone(),
        },
        std::io::ErrorKind::NotFound => Pdf2FountainError::FileNotFound { path: path.clone() },
        _ => Pdf2FountainError::InvalidInput {
            input: format!("{} ({})", path.display(), e),
        },
    })?;

    debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(ResolvedInput {
        label: path_str.to_string(),
        bytes,
    })
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, Pdf2FountainError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Pdf2FountainError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Pdf2FountainError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Pdf2FountainError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Pdf2FountainError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Pdf2FountainError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());
    Ok(ResolvedInput {
        label: url.to_string(),
        bytes: bytes.to_vec(),
    })
}

/// Derive a `.fountain` file name from an input path or URL.
pub fn output_file_name(input: &str) -> String {
    let last = input
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");
    let last = last.split(['?', '#']).next().unwrap_or("");
    let stem = Path::new(last)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("screenplay");
    format!("{stem}.fountain")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/script.pdf"));
        assert!(is_url("http://example.com/script.pdf"));
        assert!(!is_url("/tmp/script.pdf"));
        assert!(!is_url("script.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.7\n..."));
        assert!(!is_pdf_bytes(b"PK\x03\x04"));
        assert!(!is_pdf_bytes(b"%PD"));
    }

    #[test]
    fn test_is_pdf_file() {
        let mut pdf = tempfile::NamedTempFile::new().unwrap();
        pdf.write_all(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n").unwrap();
        assert!(is_pdf_file(pdf.path()));

        let mut txt = tempfile::NamedTempFile::new().unwrap();
        txt.write_all(b"INT. HOUSE - DAY").unwrap();
        assert!(!is_pdf_file(txt.path()));

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(!is_pdf_file(empty.path()));

        assert!(!is_pdf_file("/definitely/not/here.pdf"));
    }

    #[test]
    fn test_ensure_pdf_reports_magic() {
        match ensure_pdf(b"{\"a\":1}", "data.json") {
            Err(Pdf2FountainError::NotAPdf { input, magic }) => {
                assert_eq!(input, "data.json");
                assert_eq!(magic, b"{\"a\"".to_vec());
            }
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_missing_file() {
        let err = resolve_input("/definitely/not/a/real/script.pdf", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2FountainError::FileNotFound { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_resolve_rejects_non_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"FADE IN:").unwrap();
        let err = resolve_input(f.path().to_str().unwrap(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2FountainError::NotAPdf { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_resolve_reads_pdf_bytes() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.4\nrest").unwrap();
        let resolved = resolve_input(f.path().to_str().unwrap(), 5).await.unwrap();
        assert_eq!(resolved.bytes, b"%PDF-1.4\nrest".to_vec());
    }

    #[tokio::test]
    async fn test_resolve_rejects_empty_input() {
        let err = resolve_input("  ", 5).await.unwrap_err();
        assert!(matches!(err, Pdf2FountainError::InvalidInput { .. }));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("scripts/Alien.pdf"), "Alien.fountain");
        assert_eq!(
            output_file_name("https://example.com/dl/chinatown.pdf?x=1"),
            "chinatown.fountain"
        );
        assert_eq!(output_file_name("https://example.com/"), "example.fountain");
        assert_eq!(output_file_name(""), "screenplay.fountain");
    }
}
