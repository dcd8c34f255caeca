//! Batch entry points: screen a directory of documents and collect results.
//!
//! ## Failure isolation
//!
//! The one guarantee everything here is built around: a document that fails —
//! unreadable PDF, model invocation error, timeout — is recorded and skipped,
//! and every remaining document still gets processed. There is no early
//! termination and no retry; a single-shot call per document keeps the run's
//! cost and duration predictable, and retry policy, where wanted, belongs in
//! the invoker.
//!
//! Only three things are fatal: the input directory is missing, it contains
//! no documents at all (reported once, nothing written), or the output file
//! cannot be written.

use crate::config::BatchConfig;
use crate::error::PipelineError;
use crate::output::{BatchResult, BatchStats, DocumentFailure, ExtractionRecord};
use crate::pipeline::extract::{DocumentExtractor, PdfTextExtractor};
use crate::pipeline::invoke::{ModelInvoker, OllamaInvoker};
use crate::pipeline::{self, input};
use crate::prompts::DEFAULT_PREAMBLE;
use crate::sink;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Screen every PDF under `input_dir` and return the assembled result.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(BatchResult)` once every document has been attempted, even if some
/// (or all) of them failed — check `result.failures`.
///
/// # Errors
/// Returns `Err(PipelineError)` only for fatal conditions:
/// - input directory missing
/// - no PDF documents found (the batch does not run)
pub async fn run_batch(
    input_dir: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<BatchResult, PipelineError> {
    let start = Instant::now();
    let input_dir = input_dir.as_ref();
    info!("Starting batch: {}", input_dir.display());

    // ── Step 1: Discover documents ───────────────────────────────────────
    let documents = input::discover_documents(input_dir)?;
    let total = documents.len();
    info!("Found {} documents", total);

    if let Some(ref cb) = config.progress {
        cb.on_batch_start(total);
    }

    // ── Step 2: Resolve collaborators ────────────────────────────────────
    let extractor = resolve_extractor(config);
    let invoker = resolve_invoker(config);
    let preamble = config.preamble.as_deref().unwrap_or(DEFAULT_PREAMBLE);

    // ── Step 3: Process documents ────────────────────────────────────────
    // Fan out up to `concurrency` documents at a time; completion order is
    // arbitrary, so every outcome carries its input index and both sequences
    // are re-sorted before returning. With the default concurrency of 1 this
    // degenerates to the strictly sequential reference behaviour.
    let outcomes: Vec<(usize, Result<ExtractionRecord, DocumentFailure>)> =
        stream::iter(documents.iter().enumerate().map(|(index, path)| {
            let extractor = Arc::clone(&extractor);
            let invoker = Arc::clone(&invoker);
            let source_id = input::source_id_for(path);
            let path = path.clone();
            let config = config;
            async move {
                if let Some(ref cb) = config.progress {
                    cb.on_document_start(index, &source_id, total);
                }
                let outcome = pipeline::process_document(
                    extractor,
                    invoker,
                    &config.schema,
                    preamble,
                    source_id.clone(),
                    path,
                )
                .await;
                match outcome {
                    Ok(record) => {
                        if let Some(ref cb) = config.progress {
                            cb.on_document_complete(index, &source_id, total);
                        }
                        (index, Ok(record))
                    }
                    Err(reason) => {
                        warn!(document = %source_id, "document failed: {reason}");
                        if let Some(ref cb) = config.progress {
                            cb.on_document_failed(index, &source_id, total, reason.to_string());
                        }
                        (index, Err(DocumentFailure { source_id, reason }))
                    }
                }
            }
        }))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    // ── Step 4: Assemble, restoring input order ──────────────────────────
    let mut successes: Vec<(usize, ExtractionRecord)> = Vec::new();
    let mut failures: Vec<(usize, DocumentFailure)> = Vec::new();
    for (index, outcome) in outcomes {
        match outcome {
            Ok(record) => successes.push((index, record)),
            Err(failure) => failures.push((index, failure)),
        }
    }
    successes.sort_by_key(|(index, _)| *index);
    failures.sort_by_key(|(index, _)| *index);

    let records: Vec<ExtractionRecord> = successes.into_iter().map(|(_, r)| r).collect();
    let failures: Vec<DocumentFailure> = failures.into_iter().map(|(_, f)| f).collect();

    let stats = BatchStats {
        total_documents: total,
        succeeded: records.len(),
        failed: failures.len(),
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} documents in {}ms",
        stats.succeeded, stats.total_documents, stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress {
        cb.on_batch_complete(total, stats.succeeded);
    }

    Ok(BatchResult {
        records,
        failures,
        stats,
    })
}

/// Screen a directory and write the results straight to a CSV file.
///
/// The write happens only after the whole batch has been attempted; a fatal
/// discovery error (including an empty document set) means no file is
/// touched.
pub async fn run_batch_to_csv(
    input_dir: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<BatchResult, PipelineError> {
    let result = run_batch(input_dir, config).await?;
    sink::write_csv(
        &result.records,
        &config.schema,
        output_path.as_ref(),
        config.include_source_column,
    )?;
    Ok(result)
}

/// Synchronous wrapper around [`run_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_batch_sync(
    input_dir: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<BatchResult, PipelineError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PipelineError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(run_batch(input_dir, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The caller's extractor, or the built-in PDF text extractor.
fn resolve_extractor(config: &BatchConfig) -> Arc<dyn DocumentExtractor> {
    config
        .extractor
        .clone()
        .unwrap_or_else(|| Arc::new(PdfTextExtractor))
}

/// The caller's invoker, or an `ollama` subprocess invoker assembled from
/// the config's `model` / `ollama_binary` / `invoke_timeout_secs` knobs.
fn resolve_invoker(config: &BatchConfig) -> Arc<dyn ModelInvoker> {
    if let Some(ref invoker) = config.invoker {
        return Arc::clone(invoker);
    }
    let mut invoker =
        OllamaInvoker::new(config.model.clone()).with_binary(config.ollama_binary.clone());
    if let Some(secs) = config.invoke_timeout_secs {
        invoker = invoker.with_timeout(Duration::from_secs(secs));
    }
    Arc::new(invoker)
}
