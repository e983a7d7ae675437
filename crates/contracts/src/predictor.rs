//! Predictor trait - the inference capability seam
//!
//! Model loading, compilation and device selection all live behind this
//! trait; the pipeline only ever calls `predict`.

use crate::{PipelineError, Window};

/// Inference capability
///
/// Maps a batch of windows to one score vector per window. Dispatch ticks are
/// allowed to overlap, so implementations must tolerate concurrent
/// invocation (or serialize internally).
#[trait_variant::make(Predictor: Send)]
pub trait LocalPredictor: Sync {
    /// Score a batch of windows.
    ///
    /// Must return exactly one score vector per input window, in input order.
    ///
    /// # Errors
    /// Returns inference failure; the caller aborts the dispatch task.
    async fn predict(&self, windows: &[Window]) -> Result<Vec<Vec<f64>>, PipelineError>;
}

/// Stand-in predictor producing uniform scores.
///
/// Used by tests and by runs without a real inference engine wired in. The
/// score vector for every window is `1/classes` repeated `classes` times.
#[derive(Debug, Clone)]
pub struct MockPredictor {
    classes: usize,
}

impl MockPredictor {
    /// Create a mock predictor emitting `classes` scores per window.
    pub fn new(classes: usize) -> Self {
        Self {
            classes: classes.max(1),
        }
    }
}

impl Predictor for MockPredictor {
    async fn predict(&self, windows: &[Window]) -> Result<Vec<Vec<f64>>, PipelineError> {
        let uniform = 1.0 / self.classes as f64;
        Ok(windows
            .iter()
            .map(|_| vec![uniform; self.classes])
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_predictor_one_score_per_window() {
        let predictor = MockPredictor::new(4);
        let windows = vec![Window::zeros(2, 2), Window::zeros(2, 2), Window::zeros(2, 2)];
        // Both trait variants are in scope here; call through the Send one
        let scores = Predictor::predict(&predictor, &windows).await.unwrap();
        assert_eq!(scores.len(), 3);
        for vector in &scores {
            assert_eq!(vector.len(), 4);
            assert!((vector.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_mock_predictor_empty_batch() {
        let predictor = MockPredictor::new(2);
        let scores = Predictor::predict(&predictor, &[]).await.unwrap();
        assert!(scores.is_empty());
    }
}
