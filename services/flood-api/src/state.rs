//! Application state for the flood API.

use anyhow::{Context, Result};
use flood_processor::publish_atomic;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::metrics::MetricsCollector;
use crate::response::FloodMapResponse;

/// Shared application state.
pub struct AppState {
    pub config: ServiceConfig,

    /// Most recent successful result, replayed by `GET /api/flood-map`.
    pub latest: RwLock<Option<FloodMapResponse>>,

    pub metrics: MetricsCollector,

    /// Prometheus recorder handle; `None` when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create the data directories and reload the last result from disk.
    pub async fn new(config: ServiceConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        for dir in [config.uploads_dir(), config.processed_dir()] {
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let latest = load_latest(&config).await;
        if let Some(latest) = &latest {
            info!(request_id = %latest.request_id, "Restored latest flood map");
        }
        prune_processed(&config, latest.as_ref().map(|l| l.request_id.as_str())).await;

        Ok(Self {
            config,
            latest: RwLock::new(latest),
            metrics: MetricsCollector::new(),
            prometheus,
        })
    }

    /// Record `response` as the latest map, in memory and on disk, and drop
    /// the overlay of the map it replaces.
    ///
    /// The write lock is held across the file write so memory and disk
    /// agree on which request was last.
    pub async fn set_latest(&self, response: FloodMapResponse) -> Result<()> {
        let mut latest = self.latest.write().await;

        let json = serde_json::to_vec_pretty(&response)?;
        let path = self.config.latest_path();
        tokio::task::spawn_blocking(move || publish_atomic(&path, &json))
            .await
            .context("latest.json writer panicked")?
            .context("failed to persist latest.json")?;

        let previous = latest.replace(response);
        if let Some(previous) = previous {
            self.remove_output(&previous.request_id).await;
        }
        Ok(())
    }

    /// Delete a superseded request's output directory.
    async fn remove_output(&self, request_id: &str) {
        let Some(dir) = self.config.output_dir(request_id) else {
            warn!(request_id, "Refusing to remove output for invalid request id");
            return;
        };
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => debug!(request_id, "Removed superseded overlay"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(request_id, error = %e, "Failed to remove superseded overlay"),
        }
    }
}

/// Remove every output directory except the one belonging to `keep`. Only
/// safe before the server accepts requests, since in-flight requests own
/// directories that are not yet the latest.
async fn prune_processed(config: &ServiceConfig, keep: Option<&str>) {
    let dir = config.processed_dir();
    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Cannot list processed directory");
            return;
        }
    };

    let mut removed = 0usize;
    while let Ok(Some(entry)) = entries.next_entry().await {
        if keep.is_some_and(|k| entry.file_name() == k) {
            continue;
        }
        let path = entry.path();
        let result = if path.is_dir() {
            tokio::fs::remove_dir_all(&path).await
        } else {
            tokio::fs::remove_file(&path).await
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to prune stale output"),
        }
    }
    if removed > 0 {
        info!(removed, "Pruned stale overlays");
    }
}

async fn load_latest(config: &ServiceConfig) -> Option<FloodMapResponse> {
    let path = config.latest_path();
    let bytes = tokio::fs::read(&path).await.ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(latest) => Some(latest),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable latest.json");
            None
        }
    }
}
