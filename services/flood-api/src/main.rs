//! Flood API Server
//!
//! Accepts SAR raster uploads and serves flood overlays for web maps.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use flood_processor::ProcessingConfig;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use flood_api::build_router;
use flood_api::config::ServiceConfig;
use flood_api::state::AppState;

/// Flood API Server
#[derive(Parser, Debug)]
#[command(name = "flood-api")]
#[command(about = "Flood overlay server for SAR raster uploads")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "FLOOD_LISTEN_ADDR")]
    listen: String,

    /// Root directory for uploads and processed overlays
    #[arg(long, default_value = "./data", env = "FLOOD_DATA_DIR")]
    data_dir: PathBuf,

    /// Base URL used in returned image links
    #[arg(long, default_value = "http://127.0.0.1:8000", env = "FLOOD_PUBLIC_URL")]
    public_url: String,

    /// Maximum upload size in megabytes
    #[arg(long, default_value_t = 1024, env = "FLOOD_MAX_UPLOAD_MB")]
    max_upload_mb: usize,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "FLOOD_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let config = ServiceConfig {
        listen_addr: args.listen,
        data_dir: args.data_dir,
        public_url: args.public_url,
        max_upload_mb: args.max_upload_mb,
        processing: ProcessingConfig::from_env(),
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    info!(
        data_dir = %config.data_dir.display(),
        threshold = config.processing.water_threshold,
        max_output_width = config.processing.max_output_width,
        area_policy = %config.processing.area_policy,
        "Starting flood API server"
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {}", config.listen_addr))?;

    let state = Arc::new(AppState::new(config, Some(prometheus_handle)).await?);
    let app = build_router(state);

    info!("Flood API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
