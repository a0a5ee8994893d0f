//! Per-request working directories.
//!
//! Every upload gets `uploads/<id>/` for its input and `processed/<id>/` for
//! its overlay, so concurrent requests never touch the same file.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::{ServiceConfig, OVERLAY_FILE_NAME};

/// Fallback name for uploads without a usable file name.
const DEFAULT_INPUT_NAME: &str = "input.tif";

#[derive(Debug, Clone)]
pub struct RequestWorkspace {
    pub request_id: String,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl RequestWorkspace {
    /// Create both directories for `request_id`.
    pub async fn create(config: &ServiceConfig, request_id: &str) -> io::Result<Self> {
        let output_dir = config.output_dir(request_id).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid request id {:?}", request_id),
            )
        })?;
        let upload_dir = config.uploads_dir().join(request_id);
        tokio::fs::create_dir_all(&upload_dir).await?;
        tokio::fs::create_dir_all(&output_dir).await?;
        Ok(Self {
            request_id: request_id.to_string(),
            upload_dir,
            output_dir,
        })
    }

    /// Where the uploaded raster is stored. Only the final path component of
    /// the client's file name is kept.
    pub fn input_path(&self, file_name: Option<&str>) -> PathBuf {
        let name = file_name
            .and_then(|n| Path::new(n).file_name())
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .unwrap_or(DEFAULT_INPUT_NAME);
        self.upload_dir.join(name)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(OVERLAY_FILE_NAME)
    }

    /// Remove the upload directory; the input is not needed after processing.
    pub async fn remove_upload(&self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.upload_dir).await {
            warn!(
                request_id = %self.request_id,
                error = %e,
                "Failed to remove upload directory"
            );
        }
    }

    /// Remove everything, used when processing failed.
    pub async fn discard(&self) {
        self.remove_upload().await;
        if let Err(e) = tokio::fs::remove_dir_all(&self.output_dir).await {
            warn!(
                request_id = %self.request_id,
                error = %e,
                "Failed to remove output directory"
            );
        }
    }
}
