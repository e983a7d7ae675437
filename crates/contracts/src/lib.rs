//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-crate data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `Window` is one fixed-shape CSI sample (rows x cols, row-major f64)
//! - `SourceId` tags every window with the producer it came from
//! - windows and source ids travel together, index-aligned, from ingest to result

mod batch;
mod config;
mod error;
mod ingest;
mod predictor;
mod result_message;
mod sink;
mod window;

pub use batch::DrainedBatch;
pub use config::*;
pub use error::*;
pub use ingest::IngestEnvelope;
pub use predictor::{LocalPredictor, MockPredictor, Predictor};
pub use result_message::ResultMessage;
pub use sink::{LocalResultSink, ResultSink};
pub use window::{SourceId, Window};
