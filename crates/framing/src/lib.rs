//! # Framing
//!
//! Delimiter-based frame codec for the ingest and result byte streams.
//!
//! Both channels carry opaque payloads terminated by a fixed byte sequence.
//! Ingest frames end with [`WINDOW_SENTINEL`]; result frames end with
//! [`RESULT_DELIMITER`]. Payload bytes that happen to contain the delimiter
//! would split the frame early; producers are responsible for keeping the
//! sentinel out of payloads.

mod codec;
mod error;

pub use codec::{encode_frame, FrameDecoder, RESULT_DELIMITER, WINDOW_SENTINEL};
pub use error::FrameError;
