//! Error types for coordinate transformations.

use thiserror::Error;

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Errors raised while resolving or applying coordinate transformations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// The EPSG code is not present in the CRS definition table.
    #[error("unsupported CRS EPSG:{0}")]
    UnsupportedCrs(u32),

    /// A CRS string could not be parsed.
    #[error("invalid CRS identifier: {0}")]
    InvalidCrs(String),

    /// The proj engine rejected a definition.
    #[error("invalid projection definition for EPSG:{code}: {message}")]
    InvalidDefinition { code: u16, message: String },

    /// A point could not be transformed.
    #[error("transform from {from} to {to} failed: {message}")]
    TransformFailed {
        from: String,
        to: String,
        message: String,
    },

    /// An affine transform has a zero or non-finite determinant.
    #[error("degenerate affine transform: {0}")]
    DegenerateTransform(String),

    /// A computed extent has zero or non-finite area.
    #[error("degenerate extent: {0}")]
    DegenerateExtent(String),
}
