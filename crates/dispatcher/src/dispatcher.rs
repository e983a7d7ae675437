//! Dispatcher - periodic drain-predict-emit loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use batch_store::BatchStore;
use bytes::Bytes;
use contracts::{DrainedBatch, Predictor, ResultMessage};
use framing::{encode_frame, RESULT_DELIMITER};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, instrument};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::DispatchMetrics;

/// The periodic dispatcher.
///
/// Owns the sink handle; each tick drains the store and spawns an
/// independent dispatch task, so a slow prediction never blocks the
/// schedule. Result ordering across overlapping ticks follows queue
/// arrival, not drain order.
pub struct Dispatcher<P> {
    store: Arc<BatchStore>,
    predictor: Arc<P>,
    sink: SinkHandle,
    interval: Duration,
    metrics: Arc<DispatchMetrics>,
}

impl<P: Predictor + Send + Sync + 'static> Dispatcher<P> {
    /// Create a dispatcher ticking every `interval`.
    pub fn new(
        store: Arc<BatchStore>,
        predictor: Arc<P>,
        sink: SinkHandle,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            predictor,
            sink,
            interval,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Get dispatch metrics
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Spawn the scheduler loop as a background task.
    pub fn spawn(self) -> DispatcherHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let metrics = Arc::clone(&self.metrics);
        let handle = tokio::spawn(self.run(shutdown_rx));
        DispatcherHandle {
            shutdown_tx,
            handle,
            metrics,
        }
    }

    #[instrument(name = "dispatcher_run", skip(self, shutdown), fields(interval_ms = self.interval.as_millis() as u64))]
    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("Dispatcher started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(&mut in_flight);
                    // Reap finished dispatch tasks without blocking the schedule
                    while in_flight.try_join_next().is_some() {}
                }
                _ = shutdown.changed() => {
                    debug!("shutdown signalled");
                    break;
                }
            }
        }

        // Drain in-flight dispatch tasks, then stop the sink worker
        while in_flight.join_next().await.is_some() {}
        self.sink.shutdown().await;

        info!("Dispatcher shutdown complete");
    }

    /// Drain the store and spawn a dispatch task for the snapshot.
    fn tick(&self, in_flight: &mut JoinSet<()>) {
        let batch = self.store.drain();
        if batch.is_empty() {
            debug!("no pending windows, skipping tick");
            self.metrics.record_empty_tick();
            return;
        }

        let predictor = Arc::clone(&self.predictor);
        let sink_tx = self.sink.sender();
        let metrics = Arc::clone(&self.metrics);
        in_flight.spawn(async move {
            let windows = batch.len() as u64;
            let started = Instant::now();
            match dispatch_batch(batch, predictor, sink_tx).await {
                Ok(()) => metrics.record_batch(windows, started.elapsed().as_secs_f64() * 1000.0),
                Err(e) => {
                    metrics.record_failed_tick();
                    error!(windows, error = %e, "dispatch failed, batch lost");
                }
            }
        });
    }
}

/// Score one drained batch and queue the framed result.
#[instrument(name = "dispatch_batch", skip_all, fields(windows = batch.len()))]
async fn dispatch_batch<P: Predictor>(
    batch: DrainedBatch,
    predictor: Arc<P>,
    sink_tx: mpsc::Sender<Bytes>,
) -> Result<(), DispatcherError> {
    let scores = predictor.predict(&batch.windows).await?;
    debug_assert_eq!(scores.len(), batch.source_ids.len());

    let message = ResultMessage::new(scores, batch.source_ids);
    let json = serde_json::to_vec(&message)?;
    let frame = encode_frame(&json, RESULT_DELIMITER);

    sink_tx
        .send(frame)
        .await
        .map_err(|_| DispatcherError::sink_creation("result", "sink worker stopped"))?;
    Ok(())
}

/// Handle to a running dispatcher.
pub struct DispatcherHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
    metrics: Arc<DispatchMetrics>,
}

impl DispatcherHandle {
    /// Get dispatch metrics
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Stop the scheduler, wait for in-flight dispatches and the sink worker.
    #[instrument(name = "dispatcher_shutdown", skip(self))]
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            error!(error = ?e, "Dispatcher task panicked");
        }
    }
}
