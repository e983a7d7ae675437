//! Framing errors

use thiserror::Error;

/// Errors surfaced while reading frames off a stream
#[derive(Debug, Error)]
pub enum FrameError {
    /// The stream ended with buffered bytes and no terminating delimiter
    #[error("stream ended mid-frame with {buffered} undelimited bytes")]
    Truncated { buffered: usize },

    /// Underlying read failed
    #[error("frame read failed: {0}")]
    Io(#[from] std::io::Error),
}
