//! Sink implementations
//!
//! Contains StreamSink (the production unix-socket writer) and LogSink.

mod log;
mod stream;

pub use self::log::LogSink;
pub use self::stream::StreamSink;
