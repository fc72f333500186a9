//! Input classification and resolution.
//!
//! Two jobs live here. First, deciding what kind of document a reference
//! names — done by exact, case-insensitive suffix comparison against a closed
//! set of extensions, never by substring search (a path like
//! `reports.pdf.backup/file.txt` must not classify as PDF). Second,
//! normalising the reference to a local file: local paths are validated
//! (existence, readability, `%PDF` magic for PDFs), URLs are downloaded into
//! a `TempDir` whose drop removes the file even if processing panics.

use crate::error::ManualError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Declared kind of an input document, inferred from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.pdf`
    Pdf,
    /// `.doc` or `.docx` — converted to PDF before rasterisation.
    Word,
}

/// The resolved input — either a local path or a downloaded temp file.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; document downloaded to a temp directory.
    /// The `TempDir` is kept alive to defer cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Path to the document regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Classify an input reference by its file extension.
///
/// For URLs the extension of the last path segment is used, so query strings
/// and fragments do not interfere. Unrecognised extensions fail with
/// [`ManualError::UnsupportedFormat`] — this check runs before any network
/// or filesystem access.
pub fn classify(input: &str) -> Result<DocumentKind, ManualError> {
    let name = if is_url(input) {
        url_file_name(input)
    } else {
        input.to_string()
    };

    match Path::new(&name).extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => Ok(DocumentKind::Pdf),
        Some(ext) if ext.eq_ignore_ascii_case("doc") || ext.eq_ignore_ascii_case("docx") => {
            Ok(DocumentKind::Word)
        }
        _ => Err(ManualError::UnsupportedFormat {
            path: PathBuf::from(input),
        }),
    }
}

/// Last path segment of a URL, with query and fragment stripped.
fn url_file_name(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() {
                    return last.to_string();
                }
            }
        }
    }
    String::new()
}

/// Resolve the input reference to a local file path.
///
/// If the input is a URL, download it to a temporary directory.
/// If the input is a local file, validate it exists and is readable.
pub async fn resolve_input(
    input: &str,
    kind: DocumentKind,
    timeout_secs: u64,
) -> Result<ResolvedInput, ManualError> {
    if is_url(input) {
        download_url(input, kind, timeout_secs).await
    } else {
        resolve_local(input, kind)
    }
}

/// Resolve a local file path, validating existence and (for PDFs) magic bytes.
fn resolve_local(path_str: &str, kind: DocumentKind) -> Result<ResolvedInput, ManualError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ManualError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            if kind == DocumentKind::Pdf {
                use std::io::Read;
                let mut magic = [0u8; 4];
                if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                    return Err(ManualError::DocumentError {
                        path,
                        detail: format!("not a PDF (first bytes: {magic:?})"),
                    });
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ManualError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ManualError::FileNotFound { path });
        }
    }

    debug!("Resolved local document: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(
    url: &str,
    kind: DocumentKind,
    timeout_secs: u64,
) -> Result<ResolvedInput, ManualError> {
    info!("Fetching document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ManualError::FetchError {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ManualError::FetchTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ManualError::FetchError {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ManualError::FetchError {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = {
        let name = url_file_name(url);
        if name.contains('.') {
            name
        } else {
            "downloaded.pdf".to_string()
        }
    };

    let temp_dir = TempDir::new().map_err(|e| ManualError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response.bytes().await.map_err(|e| ManualError::FetchError {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if kind == DocumentKind::Pdf && bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(ManualError::DocumentError {
            path: file_path,
            detail: format!("fetched data is not a PDF (first bytes: {magic:?})"),
        });
    }

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| ManualError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Fetched to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/manual.pdf"));
        assert!(is_url("http://example.com/manual.pdf"));
        assert!(!is_url("/tmp/manual.pdf"));
        assert!(!is_url("manual.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn classify_recognised_extensions() {
        assert_eq!(classify("manual.pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(classify("Manual.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(classify("manual.docx").unwrap(), DocumentKind::Word);
        assert_eq!(classify("manual.DOC").unwrap(), DocumentKind::Word);
        assert_eq!(classify("/srv/docs/shelf.DocX").unwrap(), DocumentKind::Word);
    }

    #[test]
    fn classify_rejects_unknown_extensions() {
        for input in ["manual.txt", "manual.pdf.bak", "manual", "archive.zip"] {
            assert!(
                matches!(classify(input), Err(ManualError::UnsupportedFormat { .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn classify_is_suffix_not_substring() {
        // ".docx" appearing mid-path must not classify the input as Word.
        assert!(matches!(
            classify("/data/docx-exports/readme.txt"),
            Err(ManualError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            classify("shelf.pdf.orig"),
            Err(ManualError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn classify_url_ignores_query_string() {
        assert_eq!(
            classify("https://example.com/docs/shelf.pdf?dl=1#page=2").unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            classify("https://example.com/a/b/manual.docx?v=3").unwrap(),
            DocumentKind::Word
        );
    }

    #[test]
    fn resolve_local_missing_file() {
        let result = resolve_local("/definitely/not/here.pdf", DocumentKind::Pdf);
        assert!(matches!(result, Err(ManualError::FileNotFound { .. })));
    }

    #[test]
    fn resolve_local_rejects_non_pdf_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"GIF89a not a pdf").unwrap();

        let result = resolve_local(path.to_str().unwrap(), DocumentKind::Pdf);
        assert!(matches!(result, Err(ManualError::DocumentError { .. })));
    }

    #[tokio::test]
    async fn download_unreachable_host_is_fetch_error() {
        // Port 9 (discard) is closed on any sane machine; connection is
        // refused immediately, no external network needed.
        let result = resolve_input(
            "http://127.0.0.1:9/manual.pdf",
            DocumentKind::Pdf,
            2,
        )
        .await;
        assert!(
            matches!(result, Err(ManualError::FetchError { .. })),
            "expected FetchError, got: {result:?}",
        );
    }
}

#[cfg(test)]
impl std::fmt::Debug for ResolvedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedInput::Local(p) => write!(f, "Local({})", p.display()),
            ResolvedInput::Downloaded { path, .. } => write!(f, "Downloaded({})", path.display()),
        }
    }
}
