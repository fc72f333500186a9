//! Error types for the pdf2manual library.
//!
//! Every pipeline stage maps its failures into exactly one [`ManualError`]
//! variant, so callers can match on what went wrong without string-sniffing.
//! The pipeline is fail-fast: the first stage error aborts the run and no
//! partial manual is ever returned. Temporary artifacts are RAII-scoped, so
//! cleanup does not depend on which variant is returned.
//!
//! Messages are written for end users: they name the offending path, URL, or
//! a bounded excerpt of the model output, but never an API credential or a
//! raw backtrace.

use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of characters of raw model output carried inside
/// [`ManualError::MalformedResponse`] for diagnostics.
pub const RESPONSE_EXCERPT_LEN: usize = 400;

/// All errors returned by the pdf2manual library.
#[derive(Debug, Error)]
pub enum ManualError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The file extension is not in the recognised set (.pdf, .doc, .docx).
    #[error("Unsupported file type: '{path}'\nUpload a PDF or Word document (.pdf, .doc, .docx).")]
    UnsupportedFormat { path: PathBuf },

    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Remote document could not be fetched.
    #[error("Failed to fetch '{url}': {reason}\nCheck the URL and your network connection.")]
    FetchError { url: String, reason: String },

    /// Fetching the remote document exceeded the configured timeout.
    #[error("Fetch timed out after {secs}s for '{url}'\nIncrease the download timeout.")]
    FetchTimeout { url: String, secs: u64 },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// Word-to-PDF conversion failed (corrupt input or converter unavailable).
    #[error("Failed to convert '{path}' to PDF: {detail}")]
    ConversionError { path: PathBuf, detail: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The PDF is unreadable, corrupt, or contains no pages.
    #[error("Cannot read PDF '{path}': {detail}")]
    DocumentError { path: PathBuf, detail: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The vision model call failed (auth, quota, transport, bad request).
    #[error("Vision model extraction failed: {detail}")]
    ExtractionError { detail: String },

    /// The vision model call exceeded the configured deadline.
    #[error("Vision model call timed out after {secs}s")]
    ExtractionTimeout { secs: u64 },

    /// No vision provider could be resolved (missing API key etc.).
    #[error("Vision provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Parse errors ──────────────────────────────────────────────────────
    /// The model reply was not valid JSON in the expected shape.
    ///
    /// Carries a bounded excerpt of the raw reply for diagnosis. The reply is
    /// never evaluated as code, only parsed under the strict JSON grammar.
    #[error("Model did not return a valid instruction manual: {detail}\nResponse excerpt: {excerpt}")]
    MalformedResponse { detail: String, excerpt: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ManualError {
    /// Build a [`ManualError::MalformedResponse`] with the raw model reply
    /// clipped to [`RESPONSE_EXCERPT_LEN`] characters.
    pub fn malformed(detail: impl Into<String>, raw: &str) -> Self {
        let mut excerpt: String = raw.chars().take(RESPONSE_EXCERPT_LEN).collect();
        if raw.chars().count() > RESPONSE_EXCERPT_LEN {
            excerpt.push('\u{2026}');
        }
        ManualError::MalformedResponse {
            detail: detail.into(),
            excerpt,
        }
    }
}
