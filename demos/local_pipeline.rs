//! Local Pipeline Demo
//!
//! Runs the whole pipeline against in-process mock producers and a mock
//! consumer, all over unix sockets in a temp directory. No external
//! processes needed.
//!
//! Run with: cargo run --bin local_pipeline

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use batch_store::BatchStore;
use contracts::{IngestConfig, IngestEnvelope, MockPredictor, ResultMessage, Window};
use dispatcher::sinks::StreamSink;
use dispatcher::{Dispatcher, SinkHandle};
use flate2::write::GzEncoder;
use flate2::Compression;
use framing::{encode_frame, FrameDecoder, RESULT_DELIMITER, WINDOW_SENTINEL};
use ingestion::{IngestMetrics, ProducerListener};
use tokio::io::AsyncWriteExt;
use tokio::net::UnixListener;
use tokio::sync::watch;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const PRODUCERS: usize = 3;
const ROWS: usize = 10;
const COLS: usize = 64;
const BATCHES: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Local Pipeline Demo");

    let dir = tempfile::tempdir()?;
    let ingest = IngestConfig {
        producer_count: PRODUCERS,
        endpoint_template: dir
            .path()
            .join("producer_{}.sock")
            .to_string_lossy()
            .into_owned(),
        chunk_size: 65536,
    };
    let result_path = dir.path().join("results.sock");

    // ==== Stage 1: Mock producers bind their endpoints ====
    let mut producer_tasks = Vec::new();
    for index in 1..=PRODUCERS {
        let socket = UnixListener::bind(ingest.endpoint_for(index))?;
        producer_tasks.push(tokio::spawn(run_mock_producer(socket, index as u32)));
    }

    // ==== Stage 2: Mock consumer binds the result endpoint ====
    let result_listener = UnixListener::bind(&result_path)?;
    let consumer_task = tokio::spawn(async move {
        let (stream, _) = result_listener.accept().await?;
        let mut decoder = FrameDecoder::new(stream, RESULT_DELIMITER, 4096);
        let mut batches = 0usize;
        while let Some(payload) = decoder.next_frame().await? {
            let message: ResultMessage = serde_json::from_slice(&payload)?;
            info!(
                windows = message.len(),
                source_ids = ?message.source_ids,
                "Consumer received scored batch"
            );
            batches += 1;
            if batches >= BATCHES {
                break;
            }
        }
        Ok::<usize, Box<dyn std::error::Error + Send + Sync>>(batches)
    });

    // ==== Stage 3: Wire up the pipeline ====
    let store = Arc::new(BatchStore::new());
    let metrics = Arc::new(IngestMetrics::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut listener_handles = Vec::new();
    for index in 1..=PRODUCERS {
        let listener = ProducerListener::new(
            index,
            &ingest,
            ROWS,
            COLS,
            Arc::clone(&store),
            Arc::clone(&metrics),
        );
        listener_handles.push(listener.spawn(shutdown_rx.clone()));
    }

    let sink = StreamSink::connect("results", &result_path.to_string_lossy()).await?;
    let dispatcher = Dispatcher::new(
        Arc::clone(&store),
        Arc::new(MockPredictor::new(6)),
        SinkHandle::spawn(sink, 32),
        Duration::from_millis(500),
    );
    let dispatcher_handle = dispatcher.spawn();

    // ==== Stage 4: Let it run, then shut down ====
    let consumed = consumer_task.await?.map_err(|e| e.to_string())?;
    info!(batches = consumed, "Consumer finished");

    let _ = shutdown_tx.send(true);
    for handle in listener_handles {
        let _ = handle.await;
    }
    dispatcher_handle.shutdown().await;
    for task in producer_tasks {
        task.abort();
    }

    let snapshot = metrics.snapshot();
    info!(
        frames = snapshot.frames_received,
        windows = snapshot.windows_appended,
        decode_errors = snapshot.decode_errors,
        "Demo complete"
    );

    Ok(())
}

/// Accept the predictor's connection and ship one framed envelope per tick.
async fn run_mock_producer(socket: UnixListener, source_id: u32) {
    let Ok((mut stream, _)) = socket.accept().await else {
        return;
    };

    let mut tick = tokio::time::interval(Duration::from_millis(300));
    loop {
        tick.tick().await;
        let windows: Vec<Window> = (0..2)
            .map(|i| {
                let fill = (source_id as f64 + i as f64) / 10.0;
                Window::new(ROWS, COLS, vec![fill; ROWS * COLS]).unwrap_or_else(|_| Window::zeros(ROWS, COLS))
            })
            .collect();
        let envelope = IngestEnvelope::new(source_id, windows);

        let Ok(raw) = bincode::serialize(&envelope) else {
            return;
        };
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        if encoder.write_all(&raw).is_err() {
            return;
        }
        let Ok(compressed) = encoder.finish() else {
            return;
        };

        let frame = encode_frame(&compressed, WINDOW_SENTINEL);
        if stream.write_all(&frame).await.is_err() {
            return;
        }
    }
}
