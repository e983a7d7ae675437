//! ResultMessage - what one dispatch tick sends downstream
//!
//! Serializes as the JSON array `[scores, source_ids]` to match the
//! downstream consumer's format.

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::SourceId;

/// Scored batch, index-aligned with the drained batch that produced it.
///
/// `scores[i]` is the per-class score vector for the window that carried
/// `source_ids[i]`. On the wire this is `[scores, source_ids]`, not an
/// object, because that is what the consumer parses.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMessage {
    pub scores: Vec<Vec<f64>>,
    pub source_ids: Vec<SourceId>,
}

impl ResultMessage {
    /// Create a result message
    pub fn new(scores: Vec<Vec<f64>>, source_ids: Vec<SourceId>) -> Self {
        debug_assert_eq!(scores.len(), source_ids.len());
        Self { scores, source_ids }
    }

    /// Number of scored windows
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when the message carries no scores
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Serialize for ResultMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.scores, &self.source_ids).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResultMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (scores, source_ids): (Vec<Vec<f64>>, Vec<SourceId>) =
            Deserialize::deserialize(deserializer)?;
        if scores.len() != source_ids.len() {
            return Err(D::Error::custom(format!(
                "scores/source_ids length mismatch: {} vs {}",
                scores.len(),
                source_ids.len()
            )));
        }
        Ok(Self { scores, source_ids })
    }
}
