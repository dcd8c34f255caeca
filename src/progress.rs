//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress`] to receive real-time
//! events as the batch works through its documents.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a log, a database record, or a terminal
//! progress bar without the library knowing how the host application
//! communicates. The trait is `Send + Sync` so it works when documents are
//! processed concurrently, and the error hook takes an owned `String` so a
//! boxed callback can cross `tokio::spawn` without lifetime trouble.

use std::sync::Arc;

/// Called by the batch orchestrator as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. With `concurrency > 1` the per-document hooks may be
/// called concurrently from different tasks; implementations must guard
/// shared mutable state themselves.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once, after discovery, before any document is processed.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document enters the pipeline.
    /// `index` is the 0-based input position.
    fn on_document_start(&self, index: usize, source_id: &str, total: usize) {
        let _ = (index, source_id, total);
    }

    /// Called when a document produced a record.
    fn on_document_complete(&self, index: usize, source_id: &str, total: usize) {
        let _ = (index, source_id, total);
    }

    /// Called when a document failed extraction or invocation.
    fn on_document_failed(&self, index: usize, source_id: &str, total: usize, error: String) {
        let _ = (index, source_id, total, error);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, total_documents: usize, succeeded: usize) {
        let _ = (total_documents, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        completes: AtomicUsize,
        failures: AtomicUsize,
        final_succeeded: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_document_complete(&self, _index: usize, _source_id: &str, _total: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_document_failed(&self, _index: usize, _source_id: &str, _total: usize, _e: String) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
        fn on_batch_complete(&self, _total: usize, succeeded: usize) {
            self.final_succeeded.store(succeeded, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(3);
        cb.on_document_start(0, "a.pdf", 3);
        cb.on_document_complete(0, "a.pdf", 3);
        cb.on_document_failed(1, "b.pdf", 3, "boom".into());
        cb.on_batch_complete(3, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            completes: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            final_succeeded: AtomicUsize::new(0),
        };
        tracker.on_document_complete(0, "a.pdf", 2);
        tracker.on_document_failed(1, "b.pdf", 2, "unreadable".into());
        tracker.on_batch_complete(2, 1);

        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.failures.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.final_succeeded.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn arc_dyn_callback_crosses_tokio_spawn() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        tokio::spawn(async move {
            cb.on_document_failed(0, "a.pdf", 1, "timeout".to_string());
        })
        .await
        .expect("spawn must succeed");
    }
}
