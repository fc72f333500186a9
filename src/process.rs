//! The processing orchestrator: document in, instruction manual out.
//!
//! A linear state machine with no branching loops:
//!
//! ```text
//! classify → resolve → (convert) → render → encode → extract → parse
//! ```
//!
//! `convert` runs only for Word inputs. Every temporary artifact (downloaded
//! file, converted PDF) is held by an RAII guard that lives until this
//! function returns, so cleanup happens on success, on every typed failure,
//! and on panic. The first stage error aborts the run; no partial manual is
//! ever returned.

use crate::config::{ProcessingConfig, DEFAULT_MODEL};
use crate::error::ManualError;
use crate::manual::InstructionManual;
use crate::pipeline::input::DocumentKind;
use crate::pipeline::office::ConvertedPdf;
use crate::pipeline::{encode, input, llm, office, parse, render};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Extract an instruction manual from a document.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF or Word document
/// * `config` — Processing configuration
///
/// # Errors
/// Returns the first typed [`ManualError`] encountered; see the error module
/// for the taxonomy. The extension check runs before any network or
/// filesystem access, so an unsupported input never costs an API call.
pub async fn process(
    input_str: impl AsRef<str>,
    config: &ProcessingConfig,
) -> Result<InstructionManual, ManualError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Processing document: {}", input_str);

    // ── Step 1: Classify (no I/O) ────────────────────────────────────────
    let kind = input::classify(input_str)?;

    // ── Step 2: Resolve input (download if URL) ──────────────────────────
    let resolved = input::resolve_input(input_str, kind, config.download_timeout_secs).await?;

    // ── Step 3: Convert Word documents to a temporary PDF ────────────────
    // The guard owns the temp directory; it must outlive rendering.
    let converted: Option<ConvertedPdf> = match kind {
        DocumentKind::Word => Some(office::convert_to_pdf(resolved.path()).await?),
        DocumentKind::Pdf => None,
    };
    let pdf_path = converted
        .as_ref()
        .map(|c| c.path())
        .unwrap_or_else(|| resolved.path());

    // ── Step 4: Rasterise pages in document order ────────────────────────
    let rendered = render::render_pages(pdf_path, config).await?;

    // ── Step 5: Encode images to base64 PNG ──────────────────────────────
    let images = encode::encode_pages(&rendered)?;

    // ── Step 6: Single extraction call for the whole document ────────────
    let provider = resolve_provider(config)?;
    let raw = llm::extract_manual(&provider, images, config).await?;

    // ── Step 7: Strict parse of the reply ────────────────────────────────
    let manual = parse::parse_manual(&raw)?;

    info!(
        "Extraction complete: {} components, {} steps, {}ms total",
        manual.component_count(),
        manual.step_count(),
        total_start.elapsed().as_millis()
    );

    Ok(manual)
    // `converted` and `resolved` drop here: temporary PDFs and downloads are
    // removed on this and every earlier exit path.
}

/// Synchronous wrapper around [`process`].
///
/// Creates a temporary tokio runtime internally.
pub fn process_sync(
    input_str: impl AsRef<str>,
    config: &ProcessingConfig,
) -> Result<InstructionManual, ManualError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ManualError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(process(input_str, config))
}

/// Extract a manual from in-memory document bytes.
///
/// The bytes are written to a managed temp file named after `file_name`
/// (the extension drives kind classification) and cleaned up automatically
/// on return or panic. This is the path used by upload endpoints, where the
/// document never had a caller-visible path.
pub async fn process_bytes(
    bytes: &[u8],
    file_name: &str,
    config: &ProcessingConfig,
) -> Result<InstructionManual, ManualError> {
    // Classify first so an unsupported upload costs no disk I/O.
    input::classify(file_name)?;

    let dir = tempfile::tempdir()
        .map_err(|e| ManualError::Internal(format!("tempdir: {e}")))?;
    // Only the final path component is used; an upload name like
    // "../../etc/passwd.pdf" must stay inside the temp dir.
    let safe_name = std::path::Path::new(file_name)
        .file_name()
        .ok_or_else(|| ManualError::UnsupportedFormat {
            path: file_name.into(),
        })?;
    let path = dir.path().join(safe_name);

    let mut f = std::fs::File::create(&path)
        .map_err(|e| ManualError::Internal(format!("temp file: {e}")))?;
    f.write_all(bytes)
        .map_err(|e| ManualError::Internal(format!("temp file write: {e}")))?;
    drop(f);

    let result = process(path.to_string_lossy().as_ref(), config).await;
    // `dir` is dropped (and the file deleted) when this function returns
    result
}

/// Instantiate a named provider with the given model.
fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, ManualError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ManualError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the vision provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed and
///    configured the provider entirely; used as-is. Useful in tests or when
///    the caller needs custom middleware.
///
/// 2. **Named provider + model** (`config.provider_name`) — reads the
///    corresponding API key (`OPENAI_API_KEY`, etc.) from the environment.
///
/// 3. **Environment pair** (`PDF2MANUAL_PROVIDER` + `PDF2MANUAL_MODEL`) —
///    both set means the execution environment chose; checked before full
///    auto-detection so the model choice is honoured even when multiple API
///    keys are present.
///
/// 4. **Full auto-detection** (`ProviderFactory::from_env`) — scans known API
///    key variables and picks the first available provider, preferring
///    OpenAI when its key is present.
fn resolve_provider(config: &ProcessingConfig) -> Result<Arc<dyn LLMProvider>, ManualError> {
    // 1) User-provided provider takes priority
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_vision_provider(name, model);
    }

    // 3) Environment pair
    if let (Ok(prov), Ok(model)) = (
        std::env::var("PDF2MANUAL_PROVIDER"),
        std::env::var("PDF2MANUAL_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_vision_provider(&prov, &model);
        }
    }

    // Prefer OpenAI explicitly when an OpenAI API key is present, so users
    // with multiple provider keys default to the model the prompt was
    // written against.
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_vision_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ManualError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No vision provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_extension_fails_before_any_io() {
        // No API key, no network, no file — classification alone must reject.
        let config = ProcessingConfig::default();
        let result = process("drawing.heic", &config).await;
        assert!(matches!(result, Err(ManualError::UnsupportedFormat { .. })));
    }

    #[tokio::test]
    async fn missing_local_pdf_fails_before_extraction() {
        let config = ProcessingConfig::default();
        let result = process("/no/such/dir/manual.pdf", &config).await;
        assert!(matches!(result, Err(ManualError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn unreachable_url_is_fetch_error_without_extraction() {
        // Closed local port: refused immediately, no provider is ever
        // resolved (which would fail differently — ProviderNotConfigured).
        let config = ProcessingConfig::default();
        let result = process("http://127.0.0.1:9/manual.pdf", &config).await;
        assert!(
            matches!(result, Err(ManualError::FetchError { .. })),
            "expected FetchError, got: {:?}",
            result.err()
        );
    }

    #[tokio::test]
    async fn process_bytes_rejects_unsupported_name() {
        let config = ProcessingConfig::default();
        let result = process_bytes(b"not a doc", "upload.txt", &config).await;
        assert!(matches!(result, Err(ManualError::UnsupportedFormat { .. })));
    }
}
