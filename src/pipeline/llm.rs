//! The single vision-model call for the whole document.
//!
//! Unlike page-at-a-time OCR pipelines, the extraction here sends **all**
//! page images in one request. Step numbering and component identifiers must
//! be globally consistent across the drawing; per-page calls would let the
//! model renumber steps on every page. The trade-off is an unbounded-latency
//! call, so the await is wrapped in a deadline from
//! [`ProcessingConfig::api_timeout_secs`].
//!
//! No retry happens here: resilience policy belongs to the caller.
//! All prompt text lives in [`crate::prompts`].

use crate::config::ProcessingConfig;
use crate::error::ManualError;
use crate::prompts::{system_prompt, USER_LABEL};
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

/// Ask the vision model for the instruction manual and return its raw reply.
///
/// ## Message Layout
///
/// 1. **System message** — role framing, the four extraction rules, and the
///    JSON response-shape contract.
/// 2. **User message** — the fixed label followed by every page image in
///    document order, each as an inlined base64 attachment.
///
/// The reply is opaque text; nothing here guarantees it parses. That check is
/// [`crate::pipeline::parse`]'s job.
pub async fn extract_manual(
    provider: &Arc<dyn LLMProvider>,
    images: Vec<ImageData>,
    config: &ProcessingConfig,
) -> Result<String, ManualError> {
    if images.is_empty() {
        return Err(ManualError::Internal(
            "extraction called with no page images".to_string(),
        ));
    }

    let page_count = images.len();
    let messages = vec![
        ChatMessage::system(system_prompt()),
        ChatMessage::user_with_images(USER_LABEL, images),
    ];

    let options = build_options(config);

    info!(
        "Extracting manual: {} page image(s), model deadline {}s",
        page_count, config.api_timeout_secs
    );
    let start = Instant::now();

    let response = timeout(
        Duration::from_secs(config.api_timeout_secs),
        provider.chat(&messages, Some(&options)),
    )
    .await
    .map_err(|_| ManualError::ExtractionTimeout {
        secs: config.api_timeout_secs,
    })?
    .map_err(|e| ManualError::ExtractionError {
        detail: e.to_string(),
    })?;

    debug!(
        "Extraction reply: {} input tokens, {} output tokens, {:?}",
        response.prompt_tokens,
        response.completion_tokens,
        start.elapsed()
    );

    Ok(response.content)
}

/// Build `CompletionOptions` from the processing config.
///
/// Temperature defaults to 0.0: extraction must be deterministic and faithful
/// to what is printed in the drawing.
fn build_options(config: &ProcessingConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = ProcessingConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.0));
        assert_eq!(opts.max_tokens, Some(4096));
    }

    #[test]
    fn temperature_passes_through() {
        let config = ProcessingConfig::builder()
            .temperature(0.5)
            .build()
            .unwrap();
        assert_eq!(build_options(&config).temperature, Some(0.5));
    }
}
