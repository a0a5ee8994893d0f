//! `POST /api/upload`: run the flood pipeline on an uploaded raster.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Extension, Multipart, Query},
    Json,
};
use flood_processor::{process, FloodOverlay, ProcessingConfig};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::response::FloodMapResponse;
use crate::state::AppState;
use crate::workspace::RequestWorkspace;

/// Multipart field carrying the raster.
const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Per-request override of the water threshold.
    pub threshold: Option<f32>,
}

/// POST /api/upload - Upload a raster and build its flood overlay
pub async fn upload_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<UploadParams>, QueryRejection>,
    multipart: Multipart,
) -> Result<Json<FloodMapResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("upload", request_id = %request_id);

    let result = match params {
        Ok(Query(params)) => {
            handle_upload(&state, &request_id, params, multipart)
                .instrument(span)
                .await
        }
        Err(rejection) => Err(query_error(&rejection)),
    };

    match &result {
        Ok(_) => {}
        Err(ApiError::Processing(e)) => state.metrics.record_flood_error(e.kind()),
        Err(ApiError::BadRequest(_)) => state.metrics.record_error("bad_request"),
        Err(_) => state.metrics.record_error("internal"),
    }
    result.map(Json)
}

async fn handle_upload(
    state: &AppState,
    request_id: &str,
    params: UploadParams,
    mut multipart: Multipart,
) -> Result<FloodMapResponse, ApiError> {
    let config = request_config(&state.config.processing, params.threshold)?;
    let workspace = RequestWorkspace::create(&state.config, request_id).await?;

    let start = Instant::now();
    let overlay = match receive_and_process(state, &workspace, &mut multipart, config).await {
        Ok(overlay) => overlay,
        Err(e) => {
            workspace.discard().await;
            warn!(error = %e, "Upload failed");
            return Err(e);
        }
    };
    workspace.remove_upload().await;

    let elapsed_us = start.elapsed().as_micros() as u64;
    state
        .metrics
        .record_processing(elapsed_us, overlay.area_km2)
        .await;

    let response = FloodMapResponse::from_overlay(
        request_id,
        state.config.image_url(request_id),
        &overlay,
    );
    state
        .set_latest(response.clone())
        .await
        .map_err(|e| ApiError::Internal(format!("{:#}", e)))?;

    info!(
        area_km2 = overlay.area_km2,
        severity = ?response.stats.severity,
        elapsed_ms = elapsed_us / 1000,
        "Upload processed"
    );
    Ok(response)
}

fn query_error(rejection: &QueryRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid query parameters: {}", rejection.body_text()))
}

/// Processing config for this request, with the optional threshold applied.
fn request_config(
    base: &ProcessingConfig,
    threshold: Option<f32>,
) -> Result<ProcessingConfig, ApiError> {
    let Some(threshold) = threshold else {
        return Ok(base.clone());
    };
    let config = base.with_threshold(threshold);
    config.validate().map_err(ApiError::BadRequest)?;
    Ok(config)
}

async fn receive_and_process(
    state: &AppState,
    workspace: &RequestWorkspace,
    multipart: &mut Multipart,
    config: ProcessingConfig,
) -> Result<FloodOverlay, ApiError> {
    let input = receive_file(workspace, multipart).await?;
    state.metrics.record_upload();

    let output = workspace.output_path();
    let overlay = tokio::task::spawn_blocking(move || process(&input, &output, &config))
        .await
        .map_err(|e| ApiError::Internal(format!("processing task failed: {}", e)))??;
    Ok(overlay)
}

/// Stream the `file` part of the multipart body into the workspace.
async fn receive_file(
    workspace: &RequestWorkspace,
    multipart: &mut Multipart,
) -> Result<PathBuf, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        if file_name.as_deref() == Some("") {
            return Err(ApiError::BadRequest("No selected file".to_string()));
        }

        let path = workspace.input_path(file_name.as_deref());
        let mut file = tokio::fs::File::create(&path).await?;
        let mut received = 0usize;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::BadRequest(format!("upload interrupted: {}", e)))?
        {
            received += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!(
            file_name = ?file_name,
            bytes = received,
            "Received upload"
        );
        return Ok(path);
    }

    Err(ApiError::BadRequest("No file part".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_config_threshold() {
        let base = ProcessingConfig::default();
        assert_eq!(request_config(&base, None).unwrap(), base);
        assert_eq!(
            request_config(&base, Some(25.0)).unwrap().water_threshold,
            25.0
        );
        assert!(matches!(
            request_config(&base, Some(-1.0)),
            Err(ApiError::BadRequest(_))
        ));
    }
}
