//! Service configuration.

use std::path::{Component, Path, PathBuf};

use flood_processor::ProcessingConfig;

/// Name of the overlay image inside each request's output directory.
pub const OVERLAY_FILE_NAME: &str = "flood_mask.png";

/// Name of the persisted latest-result document.
pub const LATEST_FILE_NAME: &str = "latest.json";

/// Runtime configuration of the flood API.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,

    /// Root of `uploads/`, `processed/` and `latest.json`.
    pub data_dir: PathBuf,

    /// Base URL used to build image links, without a trailing slash.
    pub public_url: String,

    /// Maximum accepted request body in megabytes.
    pub max_upload_mb: usize,

    /// Pipeline defaults; the threshold can be overridden per request.
    pub processing: ProcessingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            data_dir: PathBuf::from("./data"),
            public_url: "http://127.0.0.1:8000".to_string(),
            max_upload_mb: 1024,
            processing: ProcessingConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Configuration rooted at `data_dir`, everything else default.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Per-request upload directories live here.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// Published overlays, served under `/static`.
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    /// Output directory of one request, `None` unless `request_id` is a
    /// single plain path component.
    pub fn output_dir(&self, request_id: &str) -> Option<PathBuf> {
        let mut components = Path::new(request_id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.processed_dir().join(request_id)),
            _ => None,
        }
    }

    /// Kept outside `processed/` so it is never served under `/static`.
    pub fn latest_path(&self) -> PathBuf {
        self.data_dir.join(LATEST_FILE_NAME)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Public URL of a request's overlay image.
    pub fn image_url(&self, request_id: &str) -> String {
        format!(
            "{}/static/{}/{}",
            self.public_url.trim_end_matches('/'),
            request_id,
            OVERLAY_FILE_NAME
        )
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_mb == 0 {
            return Err("max_upload_mb must be > 0".to_string());
        }
        self.processing.validate()
    }
}
