//! Error types for the flood pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use geotiff_parser::GeoTiffError;
use projection::ProjectionError;
use renderer::RenderError;
use serde::Serialize;
use thiserror::Error;

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Read,
    Reproject,
    Downsample,
    Encode,
    Publish,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Reproject => "reproject",
            Self::Downsample => "downsample",
            Self::Encode => "encode",
            Self::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse error category, for callers that branch on failure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SourceRead,
    Reprojection,
    Dimension,
    Encoding,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceRead => "source_read",
            Self::Reprojection => "reprojection",
            Self::Dimension => "dimension",
            Self::Encoding => "encoding",
        }
    }
}

/// Errors that can occur while turning a raster into a flood overlay.
#[derive(Error, Debug)]
pub enum FloodError {
    /// Input missing, unreadable, unsupported, or lacking CRS/transform.
    #[error("failed to read raster {}: {message}", .path.display())]
    SourceRead { path: PathBuf, message: String },

    /// CRS unsupported or transform degenerate.
    #[error("reprojection failed during {stage}: {message}")]
    Reprojection { stage: Stage, message: String },

    /// A computed grid has a zero dimension.
    #[error("invalid {width}x{height} grid during {stage}")]
    Dimension {
        stage: Stage,
        width: usize,
        height: usize,
    },

    /// The overlay could not be encoded or written.
    #[error("failed to encode overlay{}: {message}", display_target(.path))]
    Encoding {
        path: Option<PathBuf>,
        message: String,
    },
}

fn display_target(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" to {}", p.display()),
        None => String::new(),
    }
}

impl FloodError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceRead { .. } => ErrorKind::SourceRead,
            Self::Reprojection { .. } => ErrorKind::Reprojection,
            Self::Dimension { .. } => ErrorKind::Dimension,
            Self::Encoding { .. } => ErrorKind::Encoding,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::SourceRead { .. } => Stage::Read,
            Self::Reprojection { stage, .. } | Self::Dimension { stage, .. } => *stage,
            Self::Encoding { path: Some(_), .. } => Stage::Publish,
            Self::Encoding { path: None, .. } => Stage::Encode,
        }
    }

    /// Create a SourceRead error.
    pub fn source_read(path: &Path, err: GeoTiffError) -> Self {
        Self::SourceRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Classify a reader failure. Unknown CRS codes and non-invertible
    /// transforms are reprojection problems; everything else is a read error.
    pub fn read(path: &Path, err: GeoTiffError) -> Self {
        match err {
            GeoTiffError::Projection(e) => Self::Reprojection {
                stage: Stage::Reproject,
                message: format!("{}: {}", path.display(), e),
            },
            GeoTiffError::DegenerateTransform(transform) => Self::Reprojection {
                stage: Stage::Reproject,
                message: format!("{}: degenerate transform {}", path.display(), transform),
            },
            other => Self::source_read(path, other),
        }
    }

    /// Create a Reprojection error.
    pub fn reprojection(stage: Stage, err: ProjectionError) -> Self {
        Self::Reprojection {
            stage,
            message: err.to_string(),
        }
    }

    /// Create an Encoding error for in-memory rendering.
    pub fn render(err: RenderError) -> Self {
        Self::Encoding {
            path: None,
            message: err.to_string(),
        }
    }

    /// Create an Encoding error for a failed write.
    pub fn publish(path: &Path, err: std::io::Error) -> Self {
        Self::Encoding {
            path: Some(path.to_path_buf()),
            message: err.to_string(),
        }
    }
}

/// Result type for pipeline operations.
pub type FloodResult<T> = std::result::Result<T, FloodError>;
