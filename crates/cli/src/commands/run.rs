//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(interval) = args.interval {
        if !interval.is_finite() || interval <= 0.0 {
            anyhow::bail!("--interval must be finite and > 0, got {interval}");
        }
        info!(interval_secs = interval, "Overriding dispatch interval from CLI");
        config.dispatch.interval_secs = interval;
    }

    info!(
        producers = config.ingest.producer_count,
        rows = config.window.rows,
        cols = config.window.cols,
        interval_secs = config.dispatch.interval_secs,
        result_endpoint = %config.dispatch.result_endpoint,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        config,
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        log_results: args.log_results,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create and run pipeline; it owns the shutdown signal
    let pipeline = Pipeline::new(pipeline_config);

    info!("Starting pipeline...");

    let stats = pipeline
        .run(setup_shutdown_signal())
        .await
        .context("Pipeline execution failed")?;

    info!(
        windows_scored = stats.windows_scored,
        batches_dispatched = stats.batches_dispatched,
        duration_secs = stats.duration.as_secs_f64(),
        "Pipeline completed successfully"
    );

    // Print detailed statistics
    stats.print_summary();

    info!("CSI Predictor finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &contracts::PredictorConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Ingest:");
    println!("  Producers: {}", config.ingest.producer_count);
    println!("  Endpoint template: {}", config.ingest.endpoint_template);
    println!("  Chunk size: {} bytes", config.ingest.chunk_size);
    println!("\nWindow shape: {} x {}", config.window.rows, config.window.cols);
    println!("\nDispatch:");
    println!("  Interval: {}s", config.dispatch.interval_secs);
    println!("  Result endpoint: {}", config.dispatch.result_endpoint);
    println!("  Queue capacity: {}", config.dispatch.queue_capacity);
    println!("\nModel:");
    println!("  Dir: {}", config.model.dir);
    println!(
        "  Device: {}",
        config.model.device.as_deref().unwrap_or("(default)")
    );
    println!("  Classes: {}", config.model.classes);
    println!();
}
