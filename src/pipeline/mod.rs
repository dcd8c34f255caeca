//! The per-document pipeline and its stages.
//!
//! ```text
//! PDF path
//!  │
//!  ├─ 1. Extract    pull plain text out of the PDF (CPU-bound, spawn_blocking)
//!  ├─ 2. Prompt     fixed evaluation prompt from schema + extracted text
//!  ├─ 3. Invoke     one-shot call to the model process (network/process-bound)
//!  ├─ 4. Normalize  strip fences / CRLF / invisible chars from the response
//!  └─ 5. Parse      schema-shaped record; unmatched text → overflow field
//! ```
//!
//! Stages within one document are strictly sequential — each needs the
//! previous stage's output. Fan-out, if any, happens across documents in
//! [`crate::batch`], never inside this pipeline.

pub mod extract;
pub mod input;
pub mod invoke;
pub mod normalize;
pub mod parse;

use crate::error::DocumentError;
use crate::output::ExtractionRecord;
use crate::prompts;
use crate::schema::FieldSchema;
use extract::DocumentExtractor;
use invoke::ModelInvoker;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Screen one document: extract → prompt → invoke → normalize → parse.
///
/// Failure points map onto the two per-document error variants:
/// - extraction failure returns [`DocumentError::ExtractionFailed`]
///   immediately — the model is **not** invoked for unreadable input;
/// - any invocation failure (launch, non-zero exit, timeout) returns
///   [`DocumentError::InvocationFailed`] with the underlying detail.
///
/// Parsing cannot fail, so a successful invocation always yields a record,
/// stamped with `source_id`. No partial state survives a failure.
pub async fn process_document(
    extractor: Arc<dyn DocumentExtractor>,
    invoker: Arc<dyn ModelInvoker>,
    schema: &FieldSchema,
    preamble: &str,
    source_id: String,
    path: PathBuf,
) -> Result<ExtractionRecord, DocumentError> {
    // ── Stage 1: Extract ─────────────────────────────────────────────────
    let extract_path = path.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract(&extract_path))
        .await
        .map_err(|e| DocumentError::ExtractionFailed {
            source_id: source_id.clone(),
            detail: format!("extraction task failed: {e}"),
        })?
        .map_err(|e| {
            warn!(document = %source_id, "extraction failed: {e}");
            DocumentError::ExtractionFailed {
                source_id: source_id.clone(),
                detail: e.to_string(),
            }
        })?;
    debug!(document = %source_id, chars = text.len(), "extracted text");

    // ── Stage 2 + 3: Prompt, Invoke ──────────────────────────────────────
    let prompt = prompts::build_prompt(schema, preamble, &text);
    let response = invoker.invoke(&prompt).await.map_err(|e| {
        warn!(document = %source_id, "invocation failed: {e}");
        DocumentError::InvocationFailed {
            source_id: source_id.clone(),
            detail: e.to_string(),
        }
    })?;

    // ── Stage 4 + 5: Normalize, Parse ────────────────────────────────────
    let mut record = parse::parse_response(schema, &normalize::normalize_response(&response));
    record.set_source_id(source_id);
    Ok(record)
}
