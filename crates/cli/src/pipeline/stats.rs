//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::PipelineMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total ingest frames received across all listeners
    pub frames_received: u64,

    /// Total windows appended to the batch store
    pub windows_appended: u64,

    /// Frames discarded for decode or shape errors
    pub decode_errors: u64,

    /// Non-empty batches dispatched
    pub batches_dispatched: u64,

    /// Windows handed to the predictor
    pub windows_scored: u64,

    /// Ticks skipped because nothing was pending
    pub empty_ticks: u64,

    /// Ticks aborted by predictor or serialization failure
    pub failed_ticks: u64,

    /// Result frames written by the sink worker
    pub results_written: u64,

    /// Result write failures
    pub write_failures: u64,

    /// Number of producer listeners started
    pub active_listeners: usize,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// In-memory aggregation of depth/batch-size samples
    pub aggregator: PipelineMetricsAggregator,
}

impl PipelineStats {
    /// Windows per second throughput
    pub fn windows_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.windows_scored as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        let summary = self.aggregator.summary(
            self.frames_received,
            self.windows_appended,
            self.decode_errors,
            self.batches_dispatched,
            self.windows_scored,
            self.empty_ticks,
            self.failed_ticks,
        );

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Pipeline Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Active listeners: {}", self.active_listeners);
        println!("   ├─ Windows/s: {:.2}", self.windows_per_sec());
        println!("   ├─ Results written: {}", self.results_written);
        println!("   └─ Write failures: {}", self.write_failures);

        println!("\n📈 Pipeline Metrics");
        print!("{}", summary);
        println!();
    }
}
