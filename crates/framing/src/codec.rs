//! Delimiter codec
//!
//! [`encode_frame`] appends the delimiter; [`FrameDecoder`] scans a growing
//! buffer for it and hands back complete payloads, keeping any partial tail
//! for the next read. Back-to-back frames arriving in one read chunk are
//! split correctly, and a frame may span any number of reads.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::FrameError;

/// Ingest frame terminator: 19 fullwidth characters, 57 bytes of UTF-8.
///
/// Chosen by the producer side precisely because it cannot occur inside a
/// compressed payload by accident.
pub const WINDOW_SENTINEL: &[u8] = "ｅｔｅｒｎｉｔｙ＿ＴａｋｅＭｙＨａｎｄ".as_bytes();

/// Result frame terminator: a single form feed.
pub const RESULT_DELIMITER: &[u8] = b"\x0c";

/// Frame a payload for the wire by appending `delimiter`.
pub fn encode_frame(payload: &[u8], delimiter: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(payload.len() + delimiter.len());
    buf.extend_from_slice(payload);
    buf.extend_from_slice(delimiter);
    buf.freeze()
}

/// Streaming frame reader over any async byte source.
///
/// Reads `chunk_size` bytes at a time and yields one payload per delimiter
/// occurrence. The delimiter itself is consumed and never returned.
pub struct FrameDecoder<R> {
    reader: R,
    buf: BytesMut,
    delimiter: &'static [u8],
    chunk_size: usize,
    /// Scan cursor: everything before this offset is known delimiter-free.
    scanned: usize,
}

impl<R: AsyncRead + Unpin> FrameDecoder<R> {
    /// Create a decoder splitting `reader` on `delimiter`.
    pub fn new(reader: R, delimiter: &'static [u8], chunk_size: usize) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(chunk_size),
            delimiter,
            chunk_size,
            scanned: 0,
        }
    }

    /// Read the next complete payload.
    ///
    /// Returns `Ok(None)` on a clean end of stream (no buffered bytes).
    ///
    /// # Errors
    /// [`FrameError::Truncated`] if the stream ends mid-frame, or
    /// [`FrameError::Io`] if the underlying read fails.
    pub async fn next_frame(&mut self) -> Result<Option<Bytes>, FrameError> {
        loop {
            if let Some(payload) = self.split_next() {
                return Ok(Some(payload));
            }

            let mut chunk = vec![0u8; self.chunk_size];
            let n = self.reader.read(&mut chunk).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(FrameError::Truncated {
                    buffered: self.buf.len(),
                });
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Split one payload off the front of the buffer if a delimiter is there.
    fn split_next(&mut self) -> Option<Bytes> {
        if self.buf.len() < self.delimiter.len() {
            return None;
        }
        // Rescan the tail only; a partial delimiter may straddle the old end.
        let start = self.scanned.saturating_sub(self.delimiter.len() - 1);
        let pos = self.buf[start..]
            .windows(self.delimiter.len())
            .position(|w| w == self.delimiter)
            .map(|p| p + start);

        match pos {
            Some(at) => {
                let payload = self.buf.split_to(at).freeze();
                let _ = self.buf.split_to(self.delimiter.len());
                self.scanned = 0;
                Some(payload)
            }
            None => {
                self.scanned = self.buf.len();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_window_sentinel_is_57_bytes() {
        assert_eq!(WINDOW_SENTINEL.len(), 57);
    }

    #[test]
    fn test_encode_appends_delimiter() {
        let frame = encode_frame(b"hello", RESULT_DELIMITER);
        assert_eq!(&frame[..], b"hello\x0c");
    }

    #[tokio::test]
    async fn test_round_trip_single_frame() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        tx.write_all(&encode_frame(b"payload", WINDOW_SENTINEL))
            .await
            .unwrap();
        drop(tx);

        let mut decoder = FrameDecoder::new(rx, WINDOW_SENTINEL, 64);
        assert_eq!(&decoder.next_frame().await.unwrap().unwrap()[..], b"payload");
        assert!(decoder.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_back_to_back_frames_in_one_chunk() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        let mut wire = Vec::new();
        wire.extend_from_slice(&encode_frame(b"first", WINDOW_SENTINEL));
        wire.extend_from_slice(&encode_frame(b"second", WINDOW_SENTINEL));
        tx.write_all(&wire).await.unwrap();
        drop(tx);

        let mut decoder = FrameDecoder::new(rx, WINDOW_SENTINEL, 4096);
        assert_eq!(&decoder.next_frame().await.unwrap().unwrap()[..], b"first");
        assert_eq!(&decoder.next_frame().await.unwrap().unwrap()[..], b"second");
        assert!(decoder.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_frame_spanning_many_reads() {
        let payload = vec![0xabu8; 1000];
        let (mut tx, rx) = tokio::io::duplex(4096);
        tx.write_all(&encode_frame(&payload, WINDOW_SENTINEL))
            .await
            .unwrap();
        drop(tx);

        // chunk_size far smaller than the payload
        let mut decoder = FrameDecoder::new(rx, WINDOW_SENTINEL, 16);
        assert_eq!(&decoder.next_frame().await.unwrap().unwrap()[..], &payload[..]);
    }

    #[tokio::test]
    async fn test_delimiter_straddling_read_boundary() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        let frame = encode_frame(b"split", WINDOW_SENTINEL);
        // write in two halves, cutting inside the sentinel
        let cut = frame.len() - 20;
        tx.write_all(&frame[..cut]).await.unwrap();
        tx.flush().await.unwrap();
        tx.write_all(&frame[cut..]).await.unwrap();
        drop(tx);

        let mut decoder = FrameDecoder::new(rx, WINDOW_SENTINEL, 4096);
        assert_eq!(&decoder.next_frame().await.unwrap().unwrap()[..], b"split");
    }

    #[tokio::test]
    async fn test_empty_payload() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        tx.write_all(WINDOW_SENTINEL).await.unwrap();
        drop(tx);

        let mut decoder = FrameDecoder::new(rx, WINDOW_SENTINEL, 64);
        assert_eq!(decoder.next_frame().await.unwrap().unwrap().len(), 0);
        assert!(decoder.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_truncated_stream_errors() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        tx.write_all(b"never terminated").await.unwrap();
        drop(tx);

        let mut decoder = FrameDecoder::new(rx, WINDOW_SENTINEL, 64);
        let err = decoder.next_frame().await.unwrap_err();
        assert!(matches!(err, FrameError::Truncated { buffered: 16 }));
    }

    #[tokio::test]
    async fn test_result_delimiter_framing() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        tx.write_all(b"[[[0.5]],[1]]\x0c").await.unwrap();
        drop(tx);

        let mut decoder = FrameDecoder::new(rx, RESULT_DELIMITER, 64);
        assert_eq!(
            &decoder.next_frame().await.unwrap().unwrap()[..],
            b"[[[0.5]],[1]]"
        );
    }
}
