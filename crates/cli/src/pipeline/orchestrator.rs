//! Pipeline orchestrator - coordinates all components.
//!
//! Wires the batch store, the producer listeners, the dispatcher and the
//! result sink together, then runs until the shutdown future resolves, the
//! optional timeout elapses, or every listener has exited.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use batch_store::BatchStore;
use contracts::{MockPredictor, PredictorConfig};
use dispatcher::sinks::{LogSink, StreamSink};
use dispatcher::{Dispatcher, SinkHandle};
use ingestion::{IngestMetrics, ProducerListener};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The loaded predictor configuration
    pub config: PredictorConfig,

    /// Pipeline timeout (None = run until signalled)
    pub timeout: Option<Duration>,

    /// Log results instead of connecting to the result socket
    pub log_results: bool,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline until `shutdown` resolves or the timeout elapses.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let config = &self.config.config;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Shared batch store and ingest counters
        let store = Arc::new(BatchStore::new());
        let ingest_metrics = Arc::new(IngestMetrics::new());

        // Result sink
        let sink_handle = if self.config.log_results {
            info!("Results will be logged, not written to a socket");
            SinkHandle::spawn(LogSink::new("results"), config.dispatch.queue_capacity)
        } else {
            info!(endpoint = %config.dispatch.result_endpoint, "Connecting result sink...");
            let sink = StreamSink::connect("results", &config.dispatch.result_endpoint)
                .await
                .context("Failed to connect result sink")?;
            SinkHandle::spawn(sink, config.dispatch.queue_capacity)
        };
        let sink_metrics = Arc::clone(sink_handle.metrics());

        // Predictor
        //
        // TODO: load the real model from config.model.dir once the inference
        // backend lands; MockPredictor keeps the pipeline shape identical.
        info!(
            model_dir = %config.model.dir,
            classes = config.model.classes,
            "Using mock predictor"
        );
        let predictor = Arc::new(MockPredictor::new(config.model.classes));

        // Dispatcher
        let dispatcher = Dispatcher::new(
            Arc::clone(&store),
            predictor,
            sink_handle,
            Duration::from_secs_f64(config.dispatch.interval_secs),
        );
        let dispatch_metrics = dispatcher.metrics();
        let dispatcher_handle = dispatcher.spawn();

        info!(
            interval_secs = config.dispatch.interval_secs,
            "Dispatcher started"
        );

        // Producer listeners
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut listener_handles: Vec<JoinHandle<_>> = Vec::new();
        for index in 1..=config.ingest.producer_count {
            let listener = ProducerListener::new(
                index,
                &config.ingest,
                config.window.rows,
                config.window.cols,
                Arc::clone(&store),
                Arc::clone(&ingest_metrics),
            );
            info!(index, endpoint = %listener.endpoint(), "Starting producer listener");
            listener_handles.push(listener.spawn(shutdown_rx.clone()));
        }
        let active_listeners = listener_handles.len();

        info!(active_listeners, "Pipeline running");

        // Main supervision loop: sample depth once a second until stop
        let mut aggregator = observability::PipelineMetricsAggregator::new();
        let mut sample = tokio::time::interval(Duration::from_secs(1));

        let timeout = async {
            match self.config.timeout {
                Some(t) => tokio::time::sleep(t).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(timeout);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, stopping pipeline...");
                    break;
                }
                _ = &mut timeout => {
                    info!(timeout_secs = ?self.config.timeout.map(|t| t.as_secs()), "Pipeline timeout reached");
                    break;
                }
                _ = sample.tick() => {
                    aggregator.sample_pending_depth(store.len());
                }
            }
        }

        // Shutdown: stop listeners first so the final batches can drain
        info!("Shutting down pipeline...");
        let _ = shutdown_tx.send(true);
        for handle in listener_handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Listener exited with error"),
                Err(e) => warn!(error = ?e, "Listener task panicked"),
            }
        }

        let pending = store.len();
        if pending > 0 {
            warn!(pending, "Windows still pending at shutdown, dropped");
        }

        // Dispatcher shutdown waits for in-flight ticks and the sink worker
        dispatcher_handle.shutdown().await;

        let dispatch_snapshot = dispatch_metrics.snapshot();
        let ingest_snapshot = ingest_metrics.snapshot();
        let sink_snapshot = sink_metrics.snapshot();
        if dispatch_snapshot.batches_dispatched > 0 {
            aggregator.record_batch_size(
                dispatch_snapshot.windows_scored / dispatch_snapshot.batches_dispatched,
            );
        }

        let stats = PipelineStats {
            frames_received: ingest_snapshot.frames_received,
            windows_appended: ingest_snapshot.windows_appended,
            decode_errors: ingest_snapshot.decode_errors,
            batches_dispatched: dispatch_snapshot.batches_dispatched,
            windows_scored: dispatch_snapshot.windows_scored,
            empty_ticks: dispatch_snapshot.empty_ticks,
            failed_ticks: dispatch_snapshot.failed_ticks,
            results_written: sink_snapshot.write_count,
            write_failures: sink_snapshot.failure_count,
            active_listeners,
            duration: start_time.elapsed(),
            aggregator,
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            windows_per_sec = format!("{:.2}", stats.windows_per_sec()),
            "Pipeline shutdown complete"
        );

        Ok(stats)
    }
}
