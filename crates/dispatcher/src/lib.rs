//! # Dispatcher
//!
//! Periodic drain-predict-emit loop. Every tick the dispatcher drains the
//! batch store, hands the snapshot to the predictor, and queues the framed
//! result to the sink worker. Ticks run as independent tasks, so a slow
//! inference never delays the next drain; the single sink worker keeps
//! result writes serialized regardless.

mod dispatcher;
mod error;
mod handle;
mod metrics;
pub mod sinks;

pub use dispatcher::{Dispatcher, DispatcherHandle};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{DispatchMetrics, DispatchMetricsSnapshot, SinkMetrics, SinkMetricsSnapshot};
