//! # pdf2manual
//!
//! Extract structured assembly instruction manuals from part drawings
//! (PDF or Word documents) using Vision Language Models (VLMs).
//!
//! ## Why this crate?
//!
//! An assembly part drawing is almost pure graphics — exploded views,
//! numbered callouts, pictorial step sequences. Text extraction gets nothing
//! useful out of it. Instead this crate rasterises each page into a PNG and
//! lets a VLM read the drawing as a human would, returning a typed record of
//! parts, hardware, tools, and ordered assembly steps.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / DOCX
//!  │
//!  ├─ 1. Input    classify by extension; resolve local file or download URL
//!  ├─ 2. Office   Word only: convert to a scoped temporary PDF (LibreOffice)
//!  ├─ 3. Render   rasterise every page via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 4. Encode   PNG → base64 ImageData, page order preserved
//!  ├─ 5. VLM      ONE call with all pages + the fixed extraction prompt
//!  └─ 6. Parse    strict JSON → InstructionManual (never evaluated as code)
//! ```
//!
//! The whole document goes out in a single request so that step numbering
//! and component identifiers stay globally consistent across pages.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2manual::{process, ProcessingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     let config = ProcessingConfig::default();
//!     let manual = process("instruction_manual.pdf", &config).await?;
//!     println!("{}", serde_json::to_string_pretty(&manual)?);
//!     eprintln!("{} components, {} steps", manual.component_count(), manual.step_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `pdf2manual` binary (clap + anyhow + tracing-subscriber) |
//! | `server` | off     | Enables the `pdf2manual-server` binary and the [`api`] module (axum) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2manual = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

#[cfg(feature = "server")]
pub mod api;
pub mod config;
pub mod error;
pub mod manual;
pub mod pipeline;
pub mod process;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ProcessingConfig, ProcessingConfigBuilder, DEFAULT_MODEL};
pub use error::ManualError;
pub use manual::{AssemblyStep, ComponentEntry, ComponentGroup, Components, InstructionManual};
pub use process::{process, process_bytes, process_sync};
