//! Per-pipeline ingest counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared ingest counters, updated by every listener.
#[derive(Debug, Default)]
pub struct IngestMetrics {
    frames_received: AtomicU64,
    windows_appended: AtomicU64,
    decode_errors: AtomicU64,
}

/// Point-in-time copy of [`IngestMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestMetricsSnapshot {
    pub frames_received: u64,
    pub windows_appended: u64,
    pub decode_errors: u64,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_frame(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("csi_predictor_frames_received_total").increment(1);
    }

    pub(crate) fn record_windows(&self, count: u64) {
        self.windows_appended.fetch_add(count, Ordering::Relaxed);
        metrics::counter!("csi_predictor_windows_appended_total").increment(count);
    }

    pub(crate) fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("csi_predictor_decode_errors_total").increment(1);
    }

    pub fn snapshot(&self) -> IngestMetricsSnapshot {
        IngestMetricsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            windows_appended: self.windows_appended.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
        }
    }
}
