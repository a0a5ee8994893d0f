//! Health and metrics handlers.

use std::io;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub uploads: String,
    pub processed: String,
}

/// GET /health - Basic health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "flood-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /ready - Readiness check (data directories exist and are writable)
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let uploads = dir_status(&state.config.uploads_dir()).await;
    let processed = dir_status(&state.config.processed_dir()).await;
    let ready = uploads == "ok" && processed == "ok";

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadyResponse {
            ready,
            uploads,
            processed,
        }),
    )
        .into_response()
}

async fn dir_status(dir: &Path) -> String {
    let dir = dir.to_path_buf();
    match tokio::task::spawn_blocking(move || probe_writable(&dir)).await {
        Ok(Ok(())) => "ok".to_string(),
        Ok(Err(e)) => format!("error: {}", e),
        Err(e) => format!("error: {}", e),
    }
}

/// Create and drop a temp file in `dir`.
fn probe_writable(dir: &Path) -> io::Result<()> {
    if !dir.is_dir() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "not a directory"));
    }
    tempfile::NamedTempFile::new_in(dir)?;
    Ok(())
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let body = state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

/// GET /api/metrics - JSON metrics snapshot
pub async fn api_metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    Json(state.metrics.snapshot().await).into_response()
}
