//! Error types for GeoTIFF reading.

use std::path::PathBuf;

use projection::ProjectionError;
use thiserror::Error;

/// Result type for GeoTIFF operations.
pub type GeoTiffResult<T> = Result<T, GeoTiffError>;

/// Errors raised while opening or decoding a georeferenced raster.
#[derive(Error, Debug)]
pub enum GeoTiffError {
    /// The file could not be opened.
    #[error("failed to open {}: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TIFF structure or pixel data could not be decoded.
    #[error("TIFF decode error: {0}")]
    Decode(#[from] tiff::TiffError),

    /// No usable EPSG code in the GeoKey directory.
    #[error("raster has no coordinate reference system: {0}")]
    MissingCrs(String),

    /// Neither ModelTransformation nor PixelScale + Tiepoint tags are present.
    #[error("raster has no georeferencing transform: {0}")]
    MissingTransform(String),

    /// GeoKey directory is malformed.
    #[error("invalid GeoKey directory: {0}")]
    InvalidGeoKeys(String),

    /// Grid dimensions, sample count or transform are unusable.
    #[error("invalid raster grid: {0}")]
    InvalidGrid(String),

    /// The pixel-to-model transform is not invertible (zero scale).
    #[error("degenerate georeferencing transform: {0}")]
    DegenerateTransform(String),

    /// The EPSG code is not supported by the projection engine.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
