//! Pipeline configuration types
//!
//! Deserialized from TOML (or JSON) by the config loader; validation lives
//! there too so these types stay pure data.

use serde::{Deserialize, Serialize};

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Ingest side: producer endpoints and read sizing
    pub ingest: IngestConfig,

    /// Expected window shape, enforced on every decoded window
    pub window: WindowConfig,

    /// Dispatch cadence and result output
    pub dispatch: DispatchConfig,

    /// Model settings (consumed by real predictor implementations)
    pub model: ModelConfig,
}

/// Ingest listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Number of producer endpoints to listen on
    pub producer_count: usize,

    /// Endpoint path template; `{}` is replaced with the producer index
    pub endpoint_template: String,

    /// Read chunk size in bytes
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl IngestConfig {
    /// Endpoint path for producer `index`. Producers are numbered
    /// `1..=producer_count`.
    pub fn endpoint_for(&self, index: usize) -> String {
        self.endpoint_template.replacen("{}", &index.to_string(), 1)
    }
}

/// Window shape configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowConfig {
    pub rows: usize,
    pub cols: usize,
}

/// Dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Seconds between dispatch ticks
    pub interval_secs: f64,

    /// Endpoint path the result sink connects to
    pub result_endpoint: String,

    /// Bounded depth of the result sink queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding model artifacts
    pub dir: String,

    /// Compute device hint, e.g. "cpu" or "cuda:0"
    #[serde(default)]
    pub device: Option<String>,

    /// Number of output classes per window
    pub classes: usize,
}

fn default_chunk_size() -> usize {
    65536
}

fn default_queue_capacity() -> usize {
    32
}
