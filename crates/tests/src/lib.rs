//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 真实 unix socket 上的 e2e 测试
//! - 故障注入回归

#[cfg(test)]
mod contract_tests {
    use contracts::{ResultMessage, Window};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = Window::zeros(1, 1);
    }

    #[test]
    fn test_result_wire_shape_is_frozen() {
        // 下游按 [scores, source_ids] 双元素数组解析，格式不可变
        let message = ResultMessage::new(vec![vec![0.5, 0.5]], vec![42]);
        let json: serde_json::Value = serde_json::to_value(&message).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1][0], 42);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write as _;
    use std::sync::Arc;
    use std::time::Duration;

    use batch_store::BatchStore;
    use contracts::{IngestEnvelope, MockPredictor, ResultMessage, Window};
    use dispatcher::sinks::StreamSink;
    use dispatcher::{Dispatcher, SinkHandle};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use framing::{encode_frame, FrameDecoder, RESULT_DELIMITER, WINDOW_SENTINEL};
    use ingestion::{IngestMetrics, ProducerListener};
    use tokio::io::AsyncWriteExt;
    use tokio::net::UnixListener;
    use tokio::sync::watch;

    fn gzip_frame(envelope: &IngestEnvelope) -> Vec<u8> {
        let raw = bincode::serialize(envelope).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw).unwrap();
        let compressed = encoder.finish().unwrap();
        encode_frame(&compressed, WINDOW_SENTINEL).to_vec()
    }

    fn window(rows: usize, cols: usize, fill: f64) -> Window {
        Window::new(rows, cols, vec![fill; rows * cols]).unwrap()
    }

    /// End-to-end: two producers -> listeners -> batch store -> dispatcher
    /// -> result socket.
    ///
    /// 验证完整的数据流：
    /// 1. 生产者通过 unix socket 发送 gzip+bincode 帧
    /// 2. 监听器解码并追加到 batch store
    /// 3. 调度器按节拍打分并输出 JSON 结果帧
    #[tokio::test]
    async fn test_e2e_two_producers_one_result_frame() {
        let dir = tempfile::tempdir().unwrap();

        // Producer endpoints
        let ingest = contracts::IngestConfig {
            producer_count: 2,
            endpoint_template: dir
                .path()
                .join("producer_{}.sock")
                .to_string_lossy()
                .into_owned(),
            chunk_size: 65536,
        };
        let socket0 = UnixListener::bind(ingest.endpoint_for(1)).unwrap();
        let socket1 = UnixListener::bind(ingest.endpoint_for(2)).unwrap();

        // Result consumer socket
        let result_path = dir.path().join("results.sock");
        let result_listener = UnixListener::bind(&result_path).unwrap();

        // Wire up the pipeline
        let store = Arc::new(BatchStore::new());
        let metrics = Arc::new(IngestMetrics::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle0 = ProducerListener::new(1, &ingest, 2, 3, Arc::clone(&store), Arc::clone(&metrics))
            .spawn(shutdown_rx.clone());
        let handle1 = ProducerListener::new(2, &ingest, 2, 3, Arc::clone(&store), Arc::clone(&metrics))
            .spawn(shutdown_rx);

        let endpoint = result_path.to_string_lossy().into_owned();
        let connect = StreamSink::connect("results", &endpoint);
        let (accept, sink) = tokio::join!(result_listener.accept(), connect);
        let (consumer, _) = accept.unwrap();

        let dispatcher = Dispatcher::new(
            Arc::clone(&store),
            Arc::new(MockPredictor::new(4)),
            SinkHandle::spawn(sink.unwrap(), 8),
            Duration::from_millis(200),
        );
        let dispatcher_handle = dispatcher.spawn();

        // Producers send: source 1 ships two windows, source 2 ships one
        let (mut producer0, _) = socket0.accept().await.unwrap();
        let (mut producer1, _) = socket1.accept().await.unwrap();

        producer0
            .write_all(&gzip_frame(&IngestEnvelope::new(
                1,
                vec![window(2, 3, 0.1), window(2, 3, 0.2)],
            )))
            .await
            .unwrap();
        producer1
            .write_all(&gzip_frame(&IngestEnvelope::new(2, vec![window(2, 3, 0.3)])))
            .await
            .unwrap();

        // Let a tick fire, then stop everything
        tokio::time::sleep(Duration::from_millis(400)).await;
        drop(producer0);
        drop(producer1);
        let _ = shutdown_tx.send(true);
        handle0.await.unwrap().unwrap();
        handle1.await.unwrap().unwrap();
        dispatcher_handle.shutdown().await;

        // Read the framed result off the consumer side
        let mut decoder = FrameDecoder::new(consumer, RESULT_DELIMITER, 4096);
        let payload = decoder.next_frame().await.unwrap().unwrap();
        let message: ResultMessage = serde_json::from_slice(&payload).unwrap();

        assert_eq!(message.scores.len(), 3);
        assert_eq!(message.scores[0].len(), 4);
        // Cross-producer arrival order is nondeterministic, so compare sorted
        let mut ids = message.source_ids.clone();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 1, 2]);
        assert_eq!(metrics.snapshot().windows_appended, 3);
    }

    /// A malformed frame is discarded; the stream and later frames survive.
    #[tokio::test]
    async fn test_e2e_malformed_frame_does_not_poison_stream() {
        let dir = tempfile::tempdir().unwrap();

        let ingest = contracts::IngestConfig {
            producer_count: 1,
            endpoint_template: dir
                .path()
                .join("producer_{}.sock")
                .to_string_lossy()
                .into_owned(),
            chunk_size: 65536,
        };
        let socket = UnixListener::bind(ingest.endpoint_for(1)).unwrap();

        let store = Arc::new(BatchStore::new());
        let metrics = Arc::new(IngestMetrics::new());
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = ProducerListener::new(1, &ingest, 2, 2, Arc::clone(&store), Arc::clone(&metrics))
            .spawn(shutdown_rx);

        let (mut producer, _) = socket.accept().await.unwrap();
        // Corrupt frame, then a healthy one
        producer
            .write_all(&encode_frame(b"\x00\x01corrupt", WINDOW_SENTINEL))
            .await
            .unwrap();
        producer
            .write_all(&gzip_frame(&IngestEnvelope::new(9, vec![window(2, 2, 1.0)])))
            .await
            .unwrap();
        drop(producer);

        handle.await.unwrap().unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_received, 2);
        assert_eq!(snapshot.decode_errors, 1);
        let batch = store.drain();
        assert_eq!(batch.source_ids, vec![9]);
    }

    /// Empty ticks emit nothing downstream.
    #[tokio::test]
    async fn test_e2e_idle_pipeline_writes_no_results() {
        let dir = tempfile::tempdir().unwrap();
        let result_path = dir.path().join("results.sock");
        let result_listener = UnixListener::bind(&result_path).unwrap();

        let endpoint = result_path.to_string_lossy().into_owned();
        let connect = StreamSink::connect("results", &endpoint);
        let (accept, sink) = tokio::join!(result_listener.accept(), connect);
        let (consumer, _) = accept.unwrap();

        let store = Arc::new(BatchStore::new());
        let dispatcher = Dispatcher::new(
            store,
            Arc::new(MockPredictor::new(2)),
            SinkHandle::spawn(sink.unwrap(), 8),
            Duration::from_millis(50),
        );
        let handle = dispatcher.spawn();

        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.shutdown().await;

        // Stream closes with zero frames
        let mut decoder = FrameDecoder::new(consumer, RESULT_DELIMITER, 4096);
        assert!(decoder.next_frame().await.unwrap().is_none());
    }

    /// Config loaded from disk drives a working listener endpoint layout.
    #[tokio::test]
    async fn test_config_to_listener_wiring() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("p{}.sock").to_string_lossy().into_owned();
        let toml = format!(
            r#"
[ingest]
producer_count = 1
endpoint_template = "{template}"

[window]
rows = 2
cols = 2

[dispatch]
interval_secs = 0.1
result_endpoint = "{result}"

[model]
dir = "/opt/model"
classes = 2
"#,
            template = template,
            result = dir.path().join("r.sock").to_string_lossy(),
        );
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, toml).unwrap();

        let config = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        let socket = UnixListener::bind(config.ingest.endpoint_for(1)).unwrap();

        let store = Arc::new(BatchStore::new());
        let metrics = Arc::new(IngestMetrics::new());
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = ProducerListener::new(
            1,
            &config.ingest,
            config.window.rows,
            config.window.cols,
            Arc::clone(&store),
            metrics,
        )
        .spawn(shutdown_rx);

        let (mut producer, _) = socket.accept().await.unwrap();
        producer
            .write_all(&gzip_frame(&IngestEnvelope::new(3, vec![window(2, 2, 0.5)])))
            .await
            .unwrap();
        drop(producer);

        handle.await.unwrap().unwrap();
        assert_eq!(store.drain().source_ids, vec![3]);
    }
}
