//! Window - the unit of ingested CSI data
//!
//! One fixed-shape 2D sample, immutable once received.

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Integer tag identifying which producer a window originated from.
pub type SourceId = u32;

/// One CSI window: a rows x cols matrix of f64, row-major.
///
/// The shape is fixed per deployment (configured once) and every window is
/// validated against it at ingest time. The data is never mutated after
/// construction; it lives until the dispatch cycle that drains it completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Window {
    /// Create a window, checking that `data` matches `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, PipelineError> {
        if data.len() != rows * cols {
            return Err(PipelineError::frame_decode(format!(
                "window data length {} does not match shape {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// A zero-filled window, mostly useful in tests.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major sample data
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Check this window against the configured shape.
    pub fn matches_shape(&self, rows: usize, cols: usize) -> bool {
        self.rows == rows && self.cols == cols
    }
}
