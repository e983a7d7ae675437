//! ResultSink trait - dispatcher output interface
//!
//! Defines the abstract interface for result sinks. Writes are serialized by
//! a single worker task; implementations never see concurrent `send` calls.

use crate::PipelineError;

/// Result output trait
///
/// `send` receives a fully framed message (payload plus delimiter) and must
/// write it completely before returning.
#[trait_variant::make(ResultSink: Send)]
pub trait LocalResultSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one framed result message.
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn send(&mut self, frame: &[u8]) -> Result<(), PipelineError>;

    /// Flush buffered bytes (if any)
    async fn flush(&mut self) -> Result<(), PipelineError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), PipelineError>;
}
