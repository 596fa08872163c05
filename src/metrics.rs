use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    documents_summarized: AtomicU64,
    chunks_summarized: AtomicU64,
    completion_calls: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summarized document and the number of chunks it was split into.
    pub fn record_document(&self, chunk_count: u64) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.chunks_summarized
            .fetch_add(chunk_count, Ordering::Relaxed);
    }

    /// Record completion calls issued on behalf of a pipeline invocation.
    pub fn record_completion_calls(&self, calls: u64) {
        self.completion_calls.fetch_add(calls, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            completion_calls: self.completion_calls.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents summarized since startup.
    pub documents_summarized: u64,
    /// Total chunk count produced across all summarized documents.
    pub chunks_summarized: u64,
    /// Total completion calls issued, including final reduction calls.
    pub completion_calls: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_documents_and_chunks() {
        let metrics = SummaryMetrics::new();
        metrics.record_document(4);
        metrics.record_document(1);
        metrics.record_completion_calls(5);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_summarized, 2);
        assert_eq!(snapshot.chunks_summarized, 5);
        assert_eq!(snapshot.completion_calls, 5);
    }

    #[test]
    fn snapshot_starts_at_zero() {
        let metrics = SummaryMetrics::new();
        assert_eq!(metrics.snapshot().documents_summarized, 0);
        assert_eq!(metrics.snapshot().chunks_summarized, 0);
        assert_eq!(metrics.snapshot().completion_calls, 0);
    }
}
