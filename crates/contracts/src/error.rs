//! Layered error definitions
//!
//! Categorized by source: config / framing / connection / inference / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum PipelineError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Framing / Payload Errors =====
    /// Frame payload failed to decompress or deserialize.
    ///
    /// Recovered locally: the frame is discarded and logged, the listener
    /// keeps running.
    #[error("frame decode error: {message}")]
    FrameDecode { message: String },

    /// A window arrived with the wrong shape
    #[error("window shape mismatch from source {source_id}: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    WindowShape {
        source_id: u32,
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    // ===== Connection Errors =====
    /// A stream endpoint could not be reached or dropped mid-read.
    ///
    /// Fatal to the owning listener only, not to the process.
    #[error("connection error on '{endpoint}': {message}")]
    Connection { endpoint: String, message: String },

    // ===== Inference Errors =====
    /// Failure inside the inference capability.
    ///
    /// Aborts the dispatch task that triggered it; the scheduler keeps ticking.
    #[error("inference error: {message}")]
    Inference { message: String },

    // ===== Sink Errors =====
    /// Result sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create frame decode error
    pub fn frame_decode(message: impl Into<String>) -> Self {
        Self::FrameDecode {
            message: message.into(),
        }
    }

    /// Create connection error
    pub fn connection(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create inference error
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
