//! Document discovery: resolve an input directory to the batch's document set.
//!
//! The listing is sorted by file name so a batch over the same directory is
//! deterministic regardless of filesystem enumeration order — the record and
//! failure sequences downstream inherit this order.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List the PDF documents under `dir`, name-sorted.
///
/// # Errors
/// - [`PipelineError::InputDirNotFound`] when `dir` does not exist or is not
///   a directory.
/// - [`PipelineError::NoDocuments`] when the directory holds no PDFs — the
///   batch must not run and nothing is written.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::InputDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::Internal(format!(
        "failed to list '{}': {e}",
        dir.display()
    )))?;

    let mut documents: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_pdf(path))
        .collect();

    if documents.is_empty() {
        return Err(PipelineError::NoDocuments {
            path: dir.to_path_buf(),
        });
    }

    documents.sort();
    debug!(count = documents.len(), dir = %dir.display(), "discovered documents");
    Ok(documents)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// The identifier a document is known by in records, failures, and logs:
/// its file name, falling back to the full path when there is none.
pub fn source_id_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
