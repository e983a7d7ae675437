//! Ingestion errors

use framing::FrameError;
use thiserror::Error;

/// Errors terminating a listener (per-frame decode failures never surface
/// here; they are logged and the frame dropped).
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Could not connect to a producer endpoint
    #[error("connect to producer endpoint '{endpoint}' failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The producer stream failed mid-read
    #[error("producer stream failed: {0}")]
    Stream(#[from] FrameError),
}
