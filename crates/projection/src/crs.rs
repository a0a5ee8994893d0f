//! EPSG codes and point transformations between them.
//!
//! Definitions come from the `crs-definitions` EPSG table and are executed by
//! the pure-Rust `proj4rs` engine, so no system PROJ install is needed.

use std::fmt;
use std::str::FromStr;

use proj4rs::proj::Proj;
use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, ProjectionResult};

/// An EPSG coordinate reference system code known to the definition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct CrsCode(u16);

impl CrsCode {
    /// WGS84 geographic longitude/latitude.
    pub const WGS84: CrsCode = CrsCode(4326);

    /// Web Mercator.
    pub const WEB_MERCATOR: CrsCode = CrsCode(3857);

    /// Look up an EPSG code, failing if no definition exists for it.
    pub fn from_epsg(code: u32) -> ProjectionResult<Self> {
        let short = u16::try_from(code).map_err(|_| ProjectionError::UnsupportedCrs(code))?;
        if crs_definitions::from_code(short).is_none() {
            return Err(ProjectionError::UnsupportedCrs(code));
        }
        Ok(Self(short))
    }

    /// The numeric EPSG code.
    pub fn epsg(&self) -> u16 {
        self.0
    }

    /// PROJ.4 definition string for this code.
    pub fn proj_string(&self) -> ProjectionResult<&'static str> {
        crs_definitions::from_code(self.0)
            .map(|def| def.proj4)
            .ok_or(ProjectionError::UnsupportedCrs(self.0 as u32))
    }

    /// True for longitude/latitude systems (degrees rather than metres).
    pub fn is_geographic(&self) -> bool {
        match self.proj_string() {
            Ok(def) => def.contains("+proj=longlat"),
            Err(_) => self.0 == 4326,
        }
    }

    fn build_proj(&self) -> ProjectionResult<Proj> {
        let def = self.proj_string()?;
        Proj::from_proj_string(def).map_err(|e| ProjectionError::InvalidDefinition {
            code: self.0,
            message: format!("{:?}", e),
        })
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl FromStr for CrsCode {
    type Err = ProjectionError;

    /// Accepts `EPSG:32633`, `epsg:32633` or a bare `32633`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.split_once(':') {
            Some((authority, code)) if authority.eq_ignore_ascii_case("EPSG") => code,
            Some(_) => return Err(ProjectionError::InvalidCrs(s.to_string())),
            None => trimmed,
        };
        let code: u32 = digits
            .parse()
            .map_err(|_| ProjectionError::InvalidCrs(s.to_string()))?;
        Self::from_epsg(code)
    }
}

impl TryFrom<u16> for CrsCode {
    type Error = ProjectionError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_epsg(code as u32)
    }
}

impl From<CrsCode> for u16 {
    fn from(code: CrsCode) -> u16 {
        code.0
    }
}

/// Transforms points from one CRS to another.
///
/// Inputs and outputs for geographic systems are in degrees; the radian
/// convention of `proj4rs` stays internal.
pub struct CrsTransformer {
    source: CrsCode,
    target: CrsCode,
    /// `None` when source and target are the same CRS.
    projs: Option<(Proj, Proj)>,
    source_is_geographic: bool,
    target_is_geographic: bool,
}

impl CrsTransformer {
    /// Create a transformer between two codes.
    pub fn new(source: CrsCode, target: CrsCode) -> ProjectionResult<Self> {
        let projs = if source == target {
            None
        } else {
            Some((source.build_proj()?, target.build_proj()?))
        };
        Ok(Self {
            source,
            target,
            projs,
            source_is_geographic: source.is_geographic(),
            target_is_geographic: target.is_geographic(),
        })
    }

    pub fn source(&self) -> CrsCode {
        self.source
    }

    pub fn target(&self) -> CrsCode {
        self.target
    }

    /// True when no coordinate change takes place.
    pub fn is_identity(&self) -> bool {
        self.projs.is_none()
    }

    /// The transformer for the opposite direction.
    pub fn inverse(&self) -> ProjectionResult<CrsTransformer> {
        CrsTransformer::new(self.target, self.source)
    }

    /// Transform one point.
    pub fn transform(&self, x: f64, y: f64) -> ProjectionResult<(f64, f64)> {
        let Some((source_proj, target_proj)) = &self.projs else {
            return Ok((x, y));
        };

        let mut point = if self.source_is_geographic {
            (x.to_radians(), y.to_radians(), 0.0)
        } else {
            (x, y, 0.0)
        };

        proj4rs::transform::transform(source_proj, target_proj, &mut point).map_err(|e| {
            ProjectionError::TransformFailed {
                from: self.source.to_string(),
                to: self.target.to_string(),
                message: format!("{:?}", e),
            }
        })?;

        let (out_x, out_y) = if self.target_is_geographic {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };

        if !out_x.is_finite() || !out_y.is_finite() {
            return Err(ProjectionError::TransformFailed {
                from: self.source.to_string(),
                to: self.target.to_string(),
                message: format!("non-finite result for ({}, {})", x, y),
            });
        }

        Ok((out_x, out_y))
    }
}

impl fmt::Debug for CrsTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrsTransformer")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish()
    }
}
