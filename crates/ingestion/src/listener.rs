//! Producer listener task

use std::sync::Arc;

use batch_store::BatchStore;
use contracts::{IngestConfig, PipelineError};
use framing::{FrameDecoder, WINDOW_SENTINEL};
use tokio::net::UnixStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::decode::decode_payload;
use crate::error::IngestionError;
use crate::metrics::IngestMetrics;

/// One listener per producer endpoint.
///
/// Connects, splits the stream on the window sentinel, decodes frames, and
/// appends shape-valid windows to the shared store. Runs until the stream
/// closes or shutdown is signalled.
pub struct ProducerListener {
    index: usize,
    endpoint: String,
    chunk_size: usize,
    expected_rows: usize,
    expected_cols: usize,
    store: Arc<BatchStore>,
    metrics: Arc<IngestMetrics>,
}

impl ProducerListener {
    /// Create listener `index` from the ingest config.
    pub fn new(
        index: usize,
        ingest: &IngestConfig,
        expected_rows: usize,
        expected_cols: usize,
        store: Arc<BatchStore>,
        metrics: Arc<IngestMetrics>,
    ) -> Self {
        Self {
            index,
            endpoint: ingest.endpoint_for(index),
            chunk_size: ingest.chunk_size,
            expected_rows,
            expected_cols,
            store,
            metrics,
        }
    }

    /// Endpoint path this listener connects to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Spawn the listener loop onto the runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<Result<(), IngestionError>> {
        tokio::spawn(self.run(shutdown))
    }

    #[instrument(
        name = "producer_listener",
        skip(self, shutdown),
        fields(index = self.index, endpoint = %self.endpoint)
    )]
    async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), IngestionError> {
        let stream = UnixStream::connect(&self.endpoint)
            .await
            .map_err(|source| IngestionError::Connect {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        info!("connected to producer");

        let mut decoder = FrameDecoder::new(stream, WINDOW_SENTINEL, self.chunk_size);
        loop {
            let payload = tokio::select! {
                frame = decoder.next_frame() => match frame? {
                    Some(payload) => payload,
                    None => {
                        info!("producer closed stream");
                        return Ok(());
                    }
                },
                _ = shutdown.changed() => {
                    debug!("shutdown signalled, listener exiting");
                    return Ok(());
                }
            };

            self.metrics.record_frame();
            self.handle_frame(&payload);
        }
    }

    /// Decode one frame payload and append its windows.
    ///
    /// Any failure drops the frame; the stream itself stays healthy because
    /// framing is delimiter-based.
    fn handle_frame(&self, payload: &[u8]) {
        let envelope = match decode_payload(payload) {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!(%error, payload_len = payload.len(), "discarding undecodable frame");
                self.metrics.record_decode_error();
                return;
            }
        };

        for window in &envelope.windows {
            if !window.matches_shape(self.expected_rows, self.expected_cols) {
                let (rows, cols) = window.shape();
                let error = PipelineError::WindowShape {
                    source_id: envelope.source_id,
                    expected_rows: self.expected_rows,
                    expected_cols: self.expected_cols,
                    rows,
                    cols,
                };
                warn!(%error, "discarding frame");
                self.metrics.record_decode_error();
                return;
            }
        }

        let count = envelope.windows.len() as u64;
        self.store.append(envelope.windows, envelope.source_id);
        self.metrics.record_windows(count);
        debug!(source_id = envelope.source_id, windows = count, "frame appended");
    }
}
