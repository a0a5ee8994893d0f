//! Error types for overlay rendering.

use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while rendering or encoding an image.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Buffer length does not match the stated dimensions.
    #[error("buffer of {len} values does not fit a {width}x{height} image")]
    BufferSize {
        width: usize,
        height: usize,
        len: usize,
    },

    /// Image has a zero or out-of-range dimension.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// IDAT compression failed.
    #[error("IDAT compression failed: {0}")]
    Compression(#[from] std::io::Error),

    /// A colour string could not be parsed.
    #[error("invalid colour '{0}': expected \"r,g,b,a\" with components 0-255")]
    InvalidColor(String),
}
