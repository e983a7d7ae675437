//! # Batch Store
//!
//! Shared accumulation buffer between the ingest listeners and the
//! dispatcher. Listeners append windows as frames decode; every dispatch
//! tick drains the whole buffer in one atomic snapshot.

use std::mem;
use std::sync::Mutex;

use contracts::{DrainedBatch, SourceId, Window};
use tracing::trace;

#[derive(Debug, Default)]
struct Pending {
    windows: Vec<Window>,
    source_ids: Vec<SourceId>,
}

/// Mutex-guarded window buffer.
///
/// The two parallel vectors stay index-aligned under the same lock, so a
/// drain can never observe a window without its source id. Appends are
/// ordered by lock acquisition; within one producer, arrival order is
/// preserved.
#[derive(Debug, Default)]
pub struct BatchStore {
    pending: Mutex<Pending>,
}

impl BatchStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `windows` from `source_id`, tagging each with the id.
    pub fn append(&self, windows: Vec<Window>, source_id: SourceId) {
        let count = windows.len();
        if count == 0 {
            return;
        }
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending
            .source_ids
            .extend(std::iter::repeat(source_id).take(count));
        pending.windows.extend(windows);
        trace!(source_id, appended = count, pending = pending.windows.len(), "windows appended");
    }

    /// Atomically take everything pending, leaving the store empty.
    pub fn drain(&self) -> DrainedBatch {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let taken = mem::take(&mut *pending);
        DrainedBatch {
            windows: taken.windows,
            source_ids: taken.source_ids,
        }
    }

    /// Number of windows currently pending.
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .windows
            .len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
