use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    requests_summarized: AtomicU64,
    chunks_summarized: AtomicU64,
    empty_summaries: AtomicU64,
    backend_failures: AtomicU64,
    last_chunk_count: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed request and the number of chunks it was split into.
    pub fn record_summary(&self, chunk_count: u64, empty: bool) {
        self.requests_summarized.fetch_add(1, Ordering::Relaxed);
        self.chunks_summarized
            .fetch_add(chunk_count, Ordering::Relaxed);
        self.last_chunk_count.store(chunk_count, Ordering::Relaxed);
        if empty {
            self.empty_summaries.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a request aborted by a backend error.
    pub fn record_backend_failure(&self) {
        self.backend_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let last_chunk_count = self.last_chunk_count.load(Ordering::Relaxed);
        MetricsSnapshot {
            requests_summarized: self.requests_summarized.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            empty_summaries: self.empty_summaries.load(Ordering::Relaxed),
            backend_failures: self.backend_failures.load(Ordering::Relaxed),
            last_chunk_count: (last_chunk_count > 0).then_some(last_chunk_count),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Requests that produced a summary since startup.
    pub requests_summarized: u64,
    /// Total chunks summarized across those requests.
    pub chunks_summarized: u64,
    /// Requests whose summary cleaned down to nothing.
    pub empty_summaries: u64,
    /// Requests aborted by a backend error.
    pub backend_failures: u64,
    /// Chunk count of the most recent request, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_chunk_count: Option<u64>,
}
