//! # Ingestion
//!
//! One listener task per producer endpoint. Each listener connects over a
//! unix socket, splits the stream on the window sentinel, decodes each
//! frame (gzip then bincode), shape-checks the windows, and appends them to
//! the shared batch store. A malformed frame is logged and discarded; the
//! listener keeps reading.

mod decode;
mod error;
mod listener;
mod metrics;

pub use decode::decode_payload;
pub use error::IngestionError;
pub use listener::ProducerListener;
pub use metrics::{IngestMetrics, IngestMetricsSnapshot};
