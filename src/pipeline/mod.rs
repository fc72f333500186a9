//! Pipeline stages for document-to-manual extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different office converter) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ office ──▶ render ──▶ encode ──▶ llm ──▶ parse
//! (URL/path) (doc→pdf)  (pdfium)   (base64)  (VLM)   (serde)
//! ```
//!
//! 1. [`input`]  — classify the document kind and canonicalise the
//!    user-supplied path or URL to a local file
//! 2. [`office`] — Word documents only: convert to a scoped temporary PDF
//! 3. [`render`] — rasterise every page in order; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 4. [`encode`] — PNG-encode and base64-wrap each page for the multimodal
//!    request body
//! 5. [`llm`]    — the single vision-model call for the whole document; the
//!    only stage with unbounded-latency network I/O
//! 6. [`parse`]  — strict JSON deserialisation of the model reply into an
//!    [`crate::manual::InstructionManual`]

pub mod encode;
pub mod input;
pub mod llm;
pub mod office;
pub mod parse;
pub mod render;
