//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    ingest: IngestInfo,
    window: WindowInfo,
    dispatch: DispatchInfo,
    model: ModelInfo,
}

#[derive(Serialize)]
struct IngestInfo {
    producer_count: usize,
    endpoint_template: String,
    chunk_size: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    endpoints: Vec<String>,
}

#[derive(Serialize)]
struct WindowInfo {
    rows: usize,
    cols: usize,
}

#[derive(Serialize)]
struct DispatchInfo {
    interval_secs: f64,
    result_endpoint: String,
    queue_capacity: usize,
}

#[derive(Serialize)]
struct ModelInfo {
    dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<String>,
    classes: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&config, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config, args);
    }

    Ok(())
}

fn resolved_endpoints(config: &contracts::PredictorConfig) -> Vec<String> {
    (1..=config.ingest.producer_count)
        .map(|i| config.ingest.endpoint_for(i))
        .collect()
}

fn build_config_info(config: &contracts::PredictorConfig, args: &InfoArgs) -> ConfigInfo {
    let endpoints = if args.endpoints {
        resolved_endpoints(config)
    } else {
        Vec::new()
    };

    ConfigInfo {
        ingest: IngestInfo {
            producer_count: config.ingest.producer_count,
            endpoint_template: config.ingest.endpoint_template.clone(),
            chunk_size: config.ingest.chunk_size,
            endpoints,
        },
        window: WindowInfo {
            rows: config.window.rows,
            cols: config.window.cols,
        },
        dispatch: DispatchInfo {
            interval_secs: config.dispatch.interval_secs,
            result_endpoint: config.dispatch.result_endpoint.clone(),
            queue_capacity: config.dispatch.queue_capacity,
        },
        model: ModelInfo {
            dir: config.model.dir.clone(),
            device: config.model.device.clone(),
            classes: config.model.classes,
        },
    }
}

fn print_config_info(config: &contracts::PredictorConfig, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               CSI Predictor Configuration                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Ingest info
    println!("📥 Ingest");
    println!("   ├─ Producers: {}", config.ingest.producer_count);
    println!("   ├─ Endpoint template: {}", config.ingest.endpoint_template);
    println!("   └─ Chunk size: {} bytes", config.ingest.chunk_size);

    if args.endpoints {
        println!("\n🔌 Resolved Endpoints");
        let endpoints = resolved_endpoints(config);
        for (i, endpoint) in endpoints.iter().enumerate() {
            let prefix = if i == endpoints.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!("   {} {}", prefix, endpoint);
        }
    }

    // Window shape
    println!("\n🪟 Window");
    println!("   ├─ Rows: {}", config.window.rows);
    println!("   └─ Cols: {}", config.window.cols);

    // Dispatch
    println!("\n⏱️  Dispatch");
    println!("   ├─ Interval: {}s", config.dispatch.interval_secs);
    println!("   ├─ Result endpoint: {}", config.dispatch.result_endpoint);
    println!("   └─ Queue capacity: {}", config.dispatch.queue_capacity);

    // Model
    println!("\n🧠 Model");
    println!("   ├─ Dir: {}", config.model.dir);
    match &config.model.device {
        Some(device) => println!("   ├─ Device: {}", device),
        None => println!("   ├─ Device: (default)"),
    }
    println!("   └─ Classes: {}", config.model.classes);

    println!();
}
