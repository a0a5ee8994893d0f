//! Width-capped nearest-neighbour downsampling.
//!
//! Nearest-neighbour keeps every output value an exact copy of some input
//! value, so no blending happens across the no-data / water / land
//! boundaries before thresholding.

use projection::Affine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FloodError, FloodResult, Stage};
use crate::reproject::WarpedView;

/// Maximum output width; never upscales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownsampleConfig {
    pub max_width: usize,
}

impl Default for DownsampleConfig {
    fn default() -> Self {
        Self { max_width: 800 }
    }
}

impl DownsampleConfig {
    pub fn new(max_width: usize) -> Self {
        Self { max_width }
    }

    /// Plan the output grid for a `width x height` input with `transform`.
    ///
    /// `scale = min(1, max_width / width)`, `height` is rounded and the
    /// transform keeps its origin while pixel size grows by `1 / scale`.
    pub fn plan(&self, width: usize, height: usize, transform: &Affine) -> FloodResult<DownsamplePlan> {
        if width == 0 || height == 0 || self.max_width == 0 {
            return Err(FloodError::Dimension {
                stage: Stage::Downsample,
                width: self.max_width.min(width),
                height,
            });
        }

        if width <= self.max_width {
            return Ok(DownsamplePlan {
                src_width: width,
                src_height: height,
                width,
                height,
                scale: 1.0,
                transform: *transform,
            });
        }

        let scale = self.max_width as f64 / width as f64;
        let new_width = self.max_width;
        let new_height = (height as f64 * scale).round() as usize;
        if new_height == 0 {
            return Err(FloodError::Dimension {
                stage: Stage::Downsample,
                width: new_width,
                height: new_height,
            });
        }

        let transform = *transform * Affine::scale(1.0 / scale, 1.0 / scale);

        debug!(
            src_width = width,
            src_height = height,
            width = new_width,
            height = new_height,
            scale,
            "Planned downsample"
        );

        Ok(DownsamplePlan {
            src_width: width,
            src_height: height,
            width: new_width,
            height: new_height,
            scale,
            transform,
        })
    }
}

/// Output grid of a downsample step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownsamplePlan {
    pub src_width: usize,
    pub src_height: usize,
    pub width: usize,
    pub height: usize,
    /// `width / src_width`, in (0, 1].
    pub scale: f64,
    pub transform: Affine,
}

impl DownsamplePlan {
    /// True when no resampling is needed.
    pub fn is_identity(&self) -> bool {
        self.width == self.src_width && self.height == self.src_height
    }

    /// Input pixel whose area contains the centre of output pixel `(col, row)`.
    #[inline]
    pub fn source_index(&self, col: usize, row: usize) -> (usize, usize) {
        if self.is_identity() {
            return (col, row);
        }
        let src_col = ((col as f64 + 0.5) / self.scale).floor() as usize;
        let src_row = ((row as f64 + 0.5) / self.scale).floor() as usize;
        (
            src_col.min(self.src_width - 1),
            src_row.min(self.src_height - 1),
        )
    }

    /// Resample with a caller-provided sampler over the input grid.
    pub fn resample_with<F>(&self, sample: F) -> Vec<f32>
    where
        F: Fn(usize, usize) -> f32,
    {
        let mut output = Vec::with_capacity(self.width * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let (src_col, src_row) = self.source_index(col, row);
                output.push(sample(src_col, src_row));
            }
        }
        output
    }

    /// Resample a row-major in-memory grid.
    pub fn resample(&self, data: &[f32]) -> Vec<f32> {
        self.resample_with(|col, row| {
            data.get(row * self.src_width + col)
                .copied()
                .unwrap_or(f32::NAN)
        })
    }

    /// Resample straight out of a reprojected view; only the sampled
    /// destination pixels are ever computed.
    pub fn resample_view(&self, view: &WarpedView<'_>) -> Vec<f32> {
        self.resample_with(|col, row| view.get(col, row))
    }
}
