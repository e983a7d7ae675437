//! DrainedBatch - the Batch Store's drain output

use crate::{SourceId, Window};

/// An immutable snapshot of everything accumulated between two dispatch ticks.
///
/// Produced only by the batch store's drain, which atomically resets the
/// pending state. `windows` and `source_ids` are index-aligned: the window at
/// position `i` came from the producer tagged `source_ids[i]`, and arrival
/// order is preserved across all producers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainedBatch {
    pub windows: Vec<Window>,
    pub source_ids: Vec<SourceId>,
}

impl DrainedBatch {
    /// Number of windows in the snapshot.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.windows.len(), self.source_ids.len());
        self.windows.len()
    }

    /// True when nothing was pending at drain time.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
