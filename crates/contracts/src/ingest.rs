//! IngestEnvelope - the payload of one ingest frame
//!
//! Producers ship `gzip(bincode(IngestEnvelope))` per frame.

use serde::{Deserialize, Serialize};

use crate::{SourceId, Window};

/// One decoded ingest message: a producer id and the windows it batched up.
///
/// Every window in `windows` is tagged with the same `source_id` when it is
/// appended to the batch store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestEnvelope {
    /// Producer id
    pub source_id: SourceId,

    /// Windows carried by this frame, all of the configured shape
    pub windows: Vec<Window>,
}

impl IngestEnvelope {
    /// Create an envelope
    pub fn new(source_id: SourceId, windows: Vec<Window>) -> Self {
        Self { source_id, windows }
    }
}
