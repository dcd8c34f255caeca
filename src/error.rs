//! Error types for the cvsift library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PipelineError`] — **Fatal**: the batch cannot run or finish at all
//!   (input directory missing, no documents found, output file unwritable).
//!   Returned as `Err(PipelineError)` from the top-level `run_batch*`
//!   functions.
//!
//! * [`DocumentError`] — **Non-fatal**: a single document failed (unreadable
//!   PDF, model invocation failed) but all other documents are fine. Stored
//!   inside [`crate::output::BatchResult`] so callers can inspect partial
//!   success rather than losing the whole batch to one bad input.
//!
//! Parsing has no error type at all: a response the parser cannot interpret
//! yields a record with empty canonical fields and non-empty overflow
//! content, never an `Err`.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the cvsift library.
///
/// Per-document failures use [`DocumentError`] and are collected in
/// [`crate::output::BatchResult::failures`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The document-set directory does not exist or is not a directory.
    #[error("Input directory not found: '{path}'\nCheck the path exists and is readable.")]
    InputDirNotFound { path: PathBuf },

    /// The directory exists but contains no PDF documents — the batch does
    /// not run and no output file is written.
    #[error("No PDF documents found in '{path}'")]
    NoDocuments { path: PathBuf },

    /// Could not create or write the output CSV file.
    #[error("Failed to write output file '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document.
///
/// Recorded alongside the document's identifier in
/// [`crate::output::BatchResult::failures`]. The batch continues with the
/// remaining documents.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// Text extraction failed; the model was never invoked for this document.
    #[error("'{source_id}': text extraction failed: {detail}")]
    ExtractionFailed { source_id: String, detail: String },

    /// The model invocation did not succeed (launch failure, non-zero exit,
    /// or timeout).
    #[error("'{source_id}': model invocation failed: {detail}")]
    InvocationFailed { source_id: String, detail: String },
}

impl DocumentError {
    /// The identifier of the document this failure belongs to.
    pub fn source_id(&self) -> &str {
        match self {
            DocumentError::ExtractionFailed { source_id, .. }
            | DocumentError::InvocationFailed { source_id, .. } => source_id,
        }
    }

    /// Short tag for logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentError::ExtractionFailed { .. } => "extraction",
            DocumentError::InvocationFailed { .. } => "invocation",
        }
    }
}
