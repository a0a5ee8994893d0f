//! Affine pixel-to-world transforms.
//!
//! Uses the six-coefficient convention shared by GeoTIFF and most raster
//! tooling:
//!
//! ```text
//! x = a * col + b * row + c
//! y = d * col + e * row + f
//! ```
//!
//! `(col, row)` address pixel *corners*: `(0, 0)` is the upper-left corner of
//! the upper-left pixel, `(0.5, 0.5)` its centre. For a north-up raster `b`
//! and `d` are zero and `e` is negative.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, ProjectionResult};

/// Determinants smaller than this are treated as singular.
const DEGENERATE_EPSILON: f64 = 1e-15;

/// A 2-D affine transform mapping pixel coordinates to CRS coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    /// Create a transform from its six coefficients.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The identity transform.
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// A pure scaling transform.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    /// A pure translation.
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, tx, 0.0, 1.0, ty)
    }

    /// Build a north-up transform from an origin (upper-left corner) and
    /// pixel size. `pixel_height` is the positive ground size of a row.
    pub fn from_origin(west: f64, north: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self::new(pixel_width, 0.0, west, 0.0, -pixel_height, north)
    }

    /// Map a pixel coordinate to CRS coordinates.
    #[inline]
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Determinant of the linear part.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// True when the transform collapses the plane (zero scale or colinear axes).
    pub fn is_degenerate(&self) -> bool {
        let det = self.determinant();
        !det.is_finite() || det.abs() < DEGENERATE_EPSILON
    }

    /// Ground size of one pixel along each pixel axis (always positive).
    pub fn pixel_size(&self) -> (f64, f64) {
        (self.a.hypot(self.d), self.b.hypot(self.e))
    }

    /// Inverse transform, mapping CRS coordinates back to pixel coordinates.
    pub fn inverse(&self) -> ProjectionResult<Affine> {
        if self.is_degenerate() {
            return Err(ProjectionError::DegenerateTransform(format!("{:?}", self)));
        }
        let det = self.determinant();
        let ia = self.e / det;
        let ib = -self.b / det;
        let id = -self.d / det;
        let ie = self.a / det;
        Ok(Affine::new(
            ia,
            ib,
            -(ia * self.c + ib * self.f),
            id,
            ie,
            -(id * self.c + ie * self.f),
        ))
    }

    /// The four pixel-grid corners of a `width x height` raster in CRS coordinates,
    /// ordered upper-left, upper-right, lower-right, lower-left.
    pub fn corners(&self, width: usize, height: usize) -> [(f64, f64); 4] {
        let w = width as f64;
        let h = height as f64;
        [
            self.apply(0.0, 0.0),
            self.apply(w, 0.0),
            self.apply(w, h),
            self.apply(0.0, h),
        ]
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

/// Composition: `(self * rhs).apply(p) == self.apply(rhs.apply(p))`.
impl Mul for Affine {
    type Output = Affine;

    fn mul(self, rhs: Affine) -> Affine {
        Affine::new(
            self.a * rhs.a + self.b * rhs.d,
            self.a * rhs.b + self.b * rhs.e,
            self.a * rhs.c + self.b * rhs.f + self.c,
            self.d * rhs.a + self.e * rhs.d,
            self.d * rhs.b + self.e * rhs.e,
            self.d * rhs.c + self.e * rhs.f + self.f,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utm_like() -> Affine {
        Affine::from_origin(500_000.0, 5_010_000.0, 10.0, 10.0)
    }

    #[test]
    fn test_apply_north_up() {
        let t = utm_like();
        assert_eq!(t.apply(0.0, 0.0), (500_000.0, 5_010_000.0));
        assert_eq!(t.apply(100.0, 50.0), (501_000.0, 5_009_500.0));
    }

    #[test]
    fn test_inverse_roundtrip_with_rotation() {
        let t = Affine::new(9.8, 1.2, 1000.0, 0.9, -10.1, 2000.0);
        let inv = t.inverse().unwrap();
        let (x, y) = t.apply(37.25, 81.5);
        let (col, row) = inv.apply(x, y);
        assert!((col - 37.25).abs() < 1e-9);
        assert!((row - 81.5).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_has_no_inverse() {
        let t = Affine::new(0.0, 0.0, 10.0, 0.0, -1.0, 20.0);
        assert!(t.is_degenerate());
        assert!(matches!(
            t.inverse(),
            Err(ProjectionError::DegenerateTransform(_))
        ));
    }

    #[test]
    fn test_compose_with_scale_keeps_origin() {
        let t = utm_like();
        let scaled = t * Affine::scale(2.5, 2.5);
        assert_eq!(scaled.c, t.c);
        assert_eq!(scaled.f, t.f);
        assert_eq!(scaled.a, 25.0);
        assert_eq!(scaled.e, -25.0);
        assert_eq!(scaled.apply(4.0, 4.0), t.apply(10.0, 10.0));
    }

    #[test]
    fn test_pixel_size_with_rotation() {
        let angle = 30f64.to_radians();
        let t = Affine::new(
            10.0 * angle.cos(),
            -10.0 * angle.sin(),
            0.0,
            10.0 * angle.sin(),
            10.0 * angle.cos(),
            0.0,
        );
        let (px, py) = t.pixel_size();
        assert!((px - 10.0).abs() < 1e-9);
        assert!((py - 10.0).abs() < 1e-9);
    }
}
