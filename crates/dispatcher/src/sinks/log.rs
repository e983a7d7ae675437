//! LogSink - logs result summaries via tracing

use contracts::{PipelineError, ResultSink};
use tracing::{info, instrument};

/// Sink that logs result frame summaries instead of writing anywhere.
///
/// Used for dry runs and debugging.
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ResultSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_send",
        skip(self, frame),
        fields(sink = %self.name, frame_len = frame.len())
    )]
    async fn send(&mut self, frame: &[u8]) -> Result<(), PipelineError> {
        info!(
            sink = %self.name,
            bytes = frame.len(),
            "result frame"
        );
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), PipelineError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), PipelineError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
