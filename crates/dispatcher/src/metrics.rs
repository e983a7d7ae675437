//! Dispatch and sink counters

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics for a single sink worker
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Total successful writes
    write_count: AtomicU64,
    /// Total write failures
    failure_count: AtomicU64,
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    pub fn inc_write_count(&self) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("csi_predictor_result_writes_total").increment(1);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("csi_predictor_result_write_failures_total").increment(1);
    }

    pub fn snapshot(&self) -> SinkMetricsSnapshot {
        SinkMetricsSnapshot {
            queue_len: self.queue_len(),
            write_count: self.write_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct SinkMetricsSnapshot {
    pub queue_len: usize,
    pub write_count: u64,
    pub failure_count: u64,
}

/// Metrics for the dispatch loop itself
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Ticks that found a non-empty batch and dispatched it
    batches_dispatched: AtomicU64,
    /// Total windows handed to the predictor
    windows_scored: AtomicU64,
    /// Ticks skipped because nothing was pending
    empty_ticks: AtomicU64,
    /// Ticks aborted by predictor or serialization failure
    failed_ticks: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_batch(&self, windows: u64, latency_ms: f64) {
        self.batches_dispatched.fetch_add(1, Ordering::Relaxed);
        self.windows_scored.fetch_add(windows, Ordering::Relaxed);
        metrics::counter!("csi_predictor_batches_dispatched_total").increment(1);
        metrics::counter!("csi_predictor_windows_scored_total").increment(windows);
        metrics::histogram!("csi_predictor_batch_size").record(windows as f64);
        metrics::histogram!("csi_predictor_dispatch_latency_ms").record(latency_ms);
    }

    pub fn record_empty_tick(&self) {
        self.empty_ticks.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("csi_predictor_empty_ticks_total").increment(1);
    }

    pub fn record_failed_tick(&self) {
        self.failed_ticks.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("csi_predictor_failed_ticks_total").increment(1);
    }

    pub fn snapshot(&self) -> DispatchMetricsSnapshot {
        DispatchMetricsSnapshot {
            batches_dispatched: self.batches_dispatched.load(Ordering::Relaxed),
            windows_scored: self.windows_scored.load(Ordering::Relaxed),
            empty_ticks: self.empty_ticks.load(Ordering::Relaxed),
            failed_ticks: self.failed_ticks.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct DispatchMetricsSnapshot {
    pub batches_dispatched: u64,
    pub windows_scored: u64,
    pub empty_ticks: u64,
    pub failed_ticks: u64,
}
