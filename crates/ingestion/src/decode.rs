//! Ingest payload decoding
//!
//! Producers ship each frame as `gzip(bincode(IngestEnvelope))`.

use std::io::Read;

use contracts::{IngestEnvelope, PipelineError};
use flate2::read::GzDecoder;

/// Decompress and deserialize one ingest frame payload.
///
/// # Errors
/// [`PipelineError::FrameDecode`] when the gzip stream or the bincode
/// encoding is malformed.
pub fn decode_payload(payload: &[u8]) -> Result<IngestEnvelope, PipelineError> {
    let mut decoder = GzDecoder::new(payload);
    let mut raw = Vec::new();
    decoder
        .read_to_end(&mut raw)
        .map_err(|e| PipelineError::frame_decode(format!("gzip decompression failed: {e}")))?;

    bincode::deserialize(&raw)
        .map_err(|e| PipelineError::frame_decode(format!("envelope deserialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Window;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn encode(envelope: &IngestEnvelope) -> Vec<u8> {
        let raw = bincode::serialize(envelope).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decode_round_trip() {
        let envelope = IngestEnvelope::new(3, vec![Window::zeros(2, 4), Window::zeros(2, 4)]);
        let decoded = decode_payload(&encode(&envelope)).unwrap();
        assert_eq!(decoded.source_id, 3);
        assert_eq!(decoded.windows.len(), 2);
        assert_eq!(decoded.windows[0].shape(), (2, 4));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_payload(b"not gzip at all").unwrap_err();
        assert!(matches!(err, PipelineError::FrameDecode { .. }));
    }

    #[test]
    fn test_decode_rejects_gzipped_garbage() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"\xff\xff\xff\xff").unwrap();
        let payload = encoder.finish().unwrap();
        assert!(decode_payload(&payload).is_err());
    }
}
