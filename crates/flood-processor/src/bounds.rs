//! Geographic bounds of an output grid.

use projection::Affine;
use serde::{Deserialize, Serialize};

/// A lat/lon rectangle, normalised so that `north >= south` and `east >= west`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Bounds of a `width x height` grid under `transform`.
    ///
    /// All four corners go through the full affine, so rotated or bottom-up
    /// grids still produce an ordered rectangle that contains the grid.
    pub fn from_transform(transform: &Affine, width: usize, height: usize) -> Self {
        let corners = transform.corners(width, height);
        let mut bounds = Self {
            north: f64::NEG_INFINITY,
            south: f64::INFINITY,
            east: f64::NEG_INFINITY,
            west: f64::INFINITY,
        };
        for (lon, lat) in corners {
            bounds.north = bounds.north.max(lat);
            bounds.south = bounds.south.min(lat);
            bounds.east = bounds.east.max(lon);
            bounds.west = bounds.west.min(lon);
        }
        bounds
    }

    /// `[[north, west], [south, east]]`, the `[lat, lon]` corner pair order
    /// map clients expect for an image overlay.
    pub fn to_leaflet(&self) -> [[f64; 2]; 2] {
        [[self.north, self.west], [self.south, self.east]]
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}
