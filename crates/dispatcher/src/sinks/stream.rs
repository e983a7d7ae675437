//! StreamSink - writes framed results to an async byte stream

use contracts::{PipelineError, ResultSink};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, instrument};

/// Sink that writes each frame whole to an async writer.
///
/// The production configuration connects to the consumer's unix socket; the
/// generic writer keeps tests off the filesystem.
pub struct StreamSink<W> {
    name: String,
    writer: Option<W>,
}

impl StreamSink<UnixStream> {
    /// Connect to the result consumer's unix socket.
    #[instrument(name = "stream_sink_connect", skip(name), fields(endpoint = %endpoint))]
    pub async fn connect(name: impl Into<String>, endpoint: &str) -> Result<Self, PipelineError> {
        let stream = UnixStream::connect(endpoint).await.map_err(|e| {
            PipelineError::connection(endpoint, format!("result socket connect failed: {e}"))
        })?;
        debug!("StreamSink connected");
        Ok(Self::new(name, stream))
    }
}

impl<W: AsyncWrite + Unpin + Send> StreamSink<W> {
    /// Wrap an already-open writer.
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer: Some(writer),
        }
    }

    fn writer(&mut self) -> Result<&mut W, PipelineError> {
        let name = self.name.clone();
        self.writer
            .as_mut()
            .ok_or_else(|| PipelineError::sink_write(name, "stream already closed"))
    }
}

impl<W: AsyncWrite + Unpin + Send> ResultSink for StreamSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "stream_sink_send",
        skip(self, frame),
        fields(sink = %self.name, frame_len = frame.len())
    )]
    async fn send(&mut self, frame: &[u8]) -> Result<(), PipelineError> {
        let name = self.name.clone();
        let writer = self.writer()?;
        writer
            .write_all(frame)
            .await
            .map_err(|e| PipelineError::sink_write(&name, format!("write failed: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| PipelineError::sink_write(&name, format!("flush failed: {e}")))?;
        Ok(())
    }

    #[instrument(name = "stream_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), PipelineError> {
        let name = self.name.clone();
        if let Some(writer) = self.writer.as_mut() {
            writer
                .flush()
                .await
                .map_err(|e| PipelineError::sink_write(&name, format!("flush failed: {e}")))?;
        }
        Ok(())
    }

    #[instrument(name = "stream_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), PipelineError> {
        let name = self.name.clone();
        if let Some(mut writer) = self.writer.take() {
            writer
                .shutdown()
                .await
                .map_err(|e| PipelineError::sink_write(&name, format!("shutdown failed: {e}")))?;
            debug!(sink = %name, "StreamSink closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_stream_sink_writes_frames_whole() {
        let (tx, mut rx) = tokio::io::duplex(1024);
        let mut sink = StreamSink::new("test", tx);

        sink.send(b"first\x0c").await.unwrap();
        sink.send(b"second\x0c").await.unwrap();
        sink.close().await.unwrap();

        let mut received = Vec::new();
        rx.read_to_end(&mut received).await.unwrap();
        assert_eq!(&received, b"first\x0csecond\x0c");
    }

    #[tokio::test]
    async fn test_stream_sink_send_after_close_errors() {
        let (tx, _rx) = tokio::io::duplex(64);
        let mut sink = StreamSink::new("test", tx);
        sink.close().await.unwrap();

        let err = sink.send(b"late\x0c").await.unwrap_err();
        assert!(matches!(err, PipelineError::SinkWrite { .. }));
    }

    #[tokio::test]
    async fn test_stream_sink_connects_over_unix_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.sock");
        let listener = tokio::net::UnixListener::bind(&path).unwrap();

        let endpoint = path.to_string_lossy().into_owned();
        let connect = StreamSink::connect("results", &endpoint);
        let (accept, sink) = tokio::join!(listener.accept(), connect);
        let (mut server, _) = accept.unwrap();
        let mut sink = sink.unwrap();

        sink.send(b"hello\x0c").await.unwrap();
        sink.close().await.unwrap();

        let mut received = Vec::new();
        server.read_to_end(&mut received).await.unwrap();
        assert_eq!(&received, b"hello\x0c");
    }

    #[tokio::test]
    async fn test_stream_sink_connect_failure() {
        let result = StreamSink::connect("results", "/nonexistent/results.sock").await;
        assert!(matches!(result, Err(PipelineError::Connection { .. })));
    }
}
