//! # cvsift
//!
//! Batch-screen CV/resume PDFs with a local language model and normalise the
//! free-text assessments into fixed-schema CSV rows.
//!
//! ## Why this crate?
//!
//! Asking a language model to assess a resume produces useful but loosely
//! formatted text: numbered field lines, bullets, commentary — and every
//! response is shaped slightly differently. This crate owns the unglamorous
//! half of the job: turning that unstructured blob into a stable 11-column
//! record, and making sure one malformed or unreadable document can never
//! abort the rest of the batch. Whatever the parser cannot place in a
//! recognised column is folded into a Supporting Information overflow column
//! instead of being dropped — lossy in placement, never in content.
//!
//! ## Pipeline Overview
//!
//! ```text
//! directory of PDFs
//!  │
//!  ├─ 1. Discover   name-sorted *.pdf listing
//!  │   per document (failures isolated, batch never aborts):
//!  ├─ 2. Extract    PDF → plain text (pdf-extract, spawn_blocking)
//!  ├─ 3. Invoke     prompt → local model process (`ollama run <model>`)
//!  ├─ 4. Parse      response lines → schema-shaped record, rest → overflow
//!  │
//!  └─ 5. Output     CSV in fixed column order (+ Source File), atomic write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cvsift::{run_batch_to_csv, BatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder().model("mistral").build()?;
//!     let result = run_batch_to_csv("./pdfs", "processed_cvs.csv", &config).await?;
//!     eprintln!(
//!         "{} screened, {} failed",
//!         result.stats.succeeded, result.stats.failed
//!     );
//!     for failure in &result.failures {
//!         eprintln!("  {}: {}", failure.source_id, failure.reason);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cvsift` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! cvsift = { version = "0.2", default-features = false }
//! ```
//!
//! ## Swapping collaborators
//!
//! Extraction and model invocation sit behind traits
//! ([`DocumentExtractor`], [`ModelInvoker`]) injected through
//! [`BatchConfig`]; tests drive whole batches with in-memory fakes and no
//! external process, and embedders can point the same pipeline at a different
//! model backend without touching the parsing core.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod schema;
pub mod sink;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{run_batch, run_batch_sync, run_batch_to_csv};
pub use config::{BatchConfig, BatchConfigBuilder};
pub use error::{DocumentError, PipelineError};
pub use output::{BatchResult, BatchStats, DocumentFailure, ExtractionRecord};
pub use pipeline::extract::{DocumentExtractor, ExtractError, PdfTextExtractor};
pub use pipeline::invoke::{InvokeError, ModelInvoker, OllamaInvoker};
pub use pipeline::parse::{parse_generic, parse_response};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use schema::{Field, FieldSchema};
