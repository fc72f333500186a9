//! Configuration for manual extraction.
//!
//! All behaviour is controlled through [`ProcessingConfig`], built via its
//! [`ProcessingConfigBuilder`]. The config is constructed once at process
//! start and passed by shared reference into each processing run; it is never
//! mutated afterwards, so concurrent runs need no synchronisation.

use crate::error::ManualError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Model used when neither the config nor the environment names one.
///
/// The extraction prompt was written against general-purpose OpenAI vision
/// models; gpt-4o is the cheapest of those that reads engineering drawings
/// reliably.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Configuration for a document-to-manual extraction run.
///
/// # Example
/// ```rust
/// use pdf2manual::ProcessingConfig;
///
/// let config = ProcessingConfig::builder()
///     .model("gpt-4o")
///     .api_timeout_secs(180)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ProcessingConfig {
    /// Vision model identifier, e.g. "gpt-4o". If None, [`DEFAULT_MODEL`]
    /// or the provider's own default is used.
    pub model: Option<String>,

    /// Provider name (e.g. "openai", "anthropic", "ollama"). If None along
    /// with `provider`, the provider is auto-detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed provider. Takes precedence over `provider_name`.
    /// Useful in tests or when the caller needs custom middleware.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Default: 0.0.
    ///
    /// Extraction must be deterministic and faithful to the drawing, so the
    /// default is zero. Raising it introduces variation that only hurts
    /// identifier and quantity accuracy.
    pub temperature: f32,

    /// Maximum tokens the model may generate for the whole manual. Default: 4096.
    ///
    /// A dense multi-page drawing can produce a long manual; setting this too
    /// low truncates the JSON mid-object and the reply fails to parse.
    pub max_tokens: usize,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 2000.
    ///
    /// Caps memory per page regardless of physical page size: an A0 drawing
    /// at print DPI would otherwise render tens of thousands of pixels wide.
    /// 2000 px keeps fine callout numbers legible to the model while staying
    /// under typical API image-size limits.
    pub max_rendered_pixels: u32,

    /// Download timeout for URL inputs, in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Deadline for the single vision-model call, in seconds. Default: 300.
    ///
    /// The whole document goes out in one request, so this bounds the only
    /// long-blocking operation in the pipeline. Exceeding it yields
    /// [`ManualError::ExtractionTimeout`]; no retry is attempted.
    pub api_timeout_secs: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.0,
            max_tokens: 4096,
            max_rendered_pixels: 2000,
            download_timeout_secs: 120,
            api_timeout_secs: 300,
        }
    }
}

impl fmt::Debug for ProcessingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl ProcessingConfig {
    /// Create a new builder for `ProcessingConfig`.
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ProcessingConfig`].
#[derive(Debug)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessingConfig, ManualError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(ManualError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.api_timeout_secs == 0 {
            return Err(ManualError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_deterministic() {
        let config = ProcessingConfig::default();
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, 4096);
        assert!(config.model.is_none());
    }

    #[test]
    fn builder_clamps_temperature() {
        let config = ProcessingConfig::builder()
            .temperature(-1.0)
            .build()
            .unwrap();
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let result = ProcessingConfig::builder().api_timeout_secs(0).build();
        assert!(matches!(result, Err(ManualError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_zero_max_tokens() {
        let result = ProcessingConfig::builder().max_tokens(0).build();
        assert!(matches!(result, Err(ManualError::InvalidConfig(_))));
    }
}
