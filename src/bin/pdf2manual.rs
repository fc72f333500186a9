//! CLI binary for pdf2manual.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ProcessingConfig` and prints the extracted manual as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2manual::{process, ProcessingConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract a manual to stdout
  pdf2manual "Instruction Manual.pdf"

  # Word documents are converted via LibreOffice first
  pdf2manual shelf_drawing.docx -o shelf.json

  # Extract from a URL
  pdf2manual https://example.com/drawings/cabinet.pdf

  # Use a specific model
  pdf2manual --provider openai --model gpt-4o drawing.pdf

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY        OpenAI API key
  ANTHROPIC_API_KEY     Anthropic API key
  GEMINI_API_KEY        Google Gemini API key
  PDF2MANUAL_PROVIDER   Override provider (openai, anthropic, gemini, ollama)
  PDF2MANUAL_MODEL      Override model ID
  PDFIUM_LIB_PATH       Path to an existing libpdfium

SETUP:
  1. Set API key:           export OPENAI_API_KEY=sk-...
  2. For .doc/.docx input:  install LibreOffice (soffice must be on PATH)
  3. Extract:               pdf2manual drawing.pdf -o manual.json
"#;

/// Extract structured assembly instruction manuals from part drawings.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2manual",
    version,
    about = "Extract assembly instruction manuals from part drawings using Vision LLMs",
    long_about = "Extract a structured instruction manual (parts, hardware, tools, assembly \
steps) from an assembly part drawing. Accepts PDF and Word documents, local paths or URLs. \
All pages are sent to the vision model in a single request so step numbering stays \
consistent across pages.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local document path or HTTP/HTTPS URL (.pdf, .doc, .docx).
    input: String,

    /// Write the manual JSON to this file instead of stdout.
    #[arg(short, long, env = "PDF2MANUAL_OUTPUT")]
    output: Option<PathBuf>,

    /// Vision model ID (e.g. gpt-4o, claude-sonnet-4-20250514).
    #[arg(long, env = "PDF2MANUAL_MODEL")]
    model: Option<String>,

    /// Provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "PDF2MANUAL_PROVIDER")]
    provider: Option<String>,

    /// Max model output tokens for the whole manual.
    #[arg(long, env = "PDF2MANUAL_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Maximum rendered page dimension in pixels.
    #[arg(long, env = "PDF2MANUAL_MAX_PIXELS", default_value_t = 2000)]
    max_pixels: u32,

    /// HTTP download timeout in seconds (URL inputs).
    #[arg(long, env = "PDF2MANUAL_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Deadline for the vision-model call in seconds.
    #[arg(long, env = "PDF2MANUAL_API_TIMEOUT", default_value_t = 300)]
    api_timeout: u64,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long, env = "PDF2MANUAL_COMPACT")]
    compact: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MANUAL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the manual itself.
    #[arg(short, long, env = "PDF2MANUAL_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut config = ProcessingConfig::builder()
        .max_tokens(cli.max_tokens)
        .max_rendered_pixels(cli.max_pixels)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout)
        .build()
        .context("Invalid configuration")?;
    config.model = cli.model.clone();
    config.provider_name = cli.provider.clone();

    // ── Run extraction, with a spinner while the model call is in flight ─
    let spinner = if !cli.quiet {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Extracting manual from {}…", cli.input));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = process(&cli.input, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let manual = result.context("Extraction failed")?;

    let json = if cli.compact {
        serde_json::to_string(&manual).context("Failed to serialise manual")?
    } else {
        serde_json::to_string_pretty(&manual).context("Failed to serialise manual")?
    };

    if let Some(ref output_path) = cli.output {
        tokio::fs::write(output_path, &json)
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{} components, {} steps  →  {}",
                manual.component_count(),
                manual.step_count(),
                output_path.display()
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();
        if !cli.quiet {
            eprintln!(
                "{} components, {} steps",
                manual.component_count(),
                manual.step_count()
            );
        }
    }

    Ok(())
}
