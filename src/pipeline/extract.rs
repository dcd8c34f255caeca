//! Text extraction: the boundary between the pipeline and document formats.
//!
//! The pipeline only ever sees [`DocumentExtractor`]; everything about *how*
//! text leaves a PDF lives behind it. The core treats any failure uniformly —
//! missing file, corrupt format, encrypted document, no extractable text —
//! as an extraction failure for that one document, and never invokes the
//! model for it.
//!
//! Extraction is CPU-bound, so the processor runs it under
//! `tokio::task::spawn_blocking`; implementations stay synchronous.

use std::path::Path;
use thiserror::Error;

/// Why a document's text could not be extracted.
///
/// Deliberately a single opaque detail string: downstream the cause makes no
/// difference, every variant of "unreadable" ends up as the same per-document
/// failure entry.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ExtractError(pub String);

/// Pulls plain text out of one document on disk.
///
/// Implementations must be `Send + Sync`; the batch may process documents
/// concurrently.
pub trait DocumentExtractor: Send + Sync {
    /// Extract the full text of the document at `path`.
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Default extractor: plain-text extraction via the `pdf-extract` crate.
///
/// Scanned (image-only) PDFs come out empty; that is reported as an error
/// rather than letting an empty prompt reach the model.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl DocumentExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        if !path.exists() {
            return Err(ExtractError(format!("file not found: {}", path.display())));
        }

        let text = pdf_extract::extract_text(path)
            .map_err(|e| ExtractError(format!("failed to read PDF: {e}")))?;

        if text.trim().is_empty() {
            return Err(ExtractError(
                "document contains no extractable text (scanned or empty PDF)".into(),
            ));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_extract_error() {
        let err = PdfTextExtractor
            .extract(Path::new("/definitely/not/here.pdf"))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn non_pdf_bytes_are_an_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_pdf.pdf");
        std::fs::write(&path, b"just some text").unwrap();

        let err = PdfTextExtractor.extract(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read PDF"), "got: {err}");
    }
}
