//! Flood mask to RGBA overlay.
//!
//! Water pixels take the overlay colour; everything else is fully
//! transparent so the overlay can sit on top of a basemap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::png::create_png;

/// Mask value marking a water pixel.
pub const MASK_WATER: u8 = 255;

/// Mask value marking a non-water pixel.
pub const MASK_DRY: u8 = 0;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Semi-transparent red used for flooded pixels.
    pub const FLOOD_RED: Color = Color::new(255, 0, 0, 200);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::FLOOD_RED
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = RenderError;

    /// Parses `"r,g,b,a"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u8> = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| RenderError::InvalidColor(s.to_string()))?;
        match parts.as_slice() {
            [r, g, b, a] => Ok(Color::new(*r, *g, *b, *a)),
            _ => Err(RenderError::InvalidColor(s.to_string())),
        }
    }
}

/// Render a water mask as RGBA pixels.
///
/// Any non-zero mask value counts as water.
pub fn render_mask(
    mask: &[u8],
    width: usize,
    height: usize,
    water: Color,
) -> RenderResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    if mask.len() != width * height {
        return Err(RenderError::BufferSize {
            width,
            height,
            len: mask.len(),
        });
    }

    let water = water.to_array();
    let dry = Color::transparent().to_array();
    let mut pixels = vec![0u8; mask.len() * 4];
    for (pixel, &m) in pixels.chunks_exact_mut(4).zip(mask) {
        pixel.copy_from_slice(if m != MASK_DRY { &water } else { &dry });
    }
    Ok(pixels)
}

/// Render a water mask straight to PNG bytes.
pub fn render_overlay_png(
    mask: &[u8],
    width: usize,
    height: usize,
    water: Color,
) -> RenderResult<Vec<u8>> {
    let pixels = render_mask(mask, width, height, water)?;
    create_png(&pixels, width, height)
}
