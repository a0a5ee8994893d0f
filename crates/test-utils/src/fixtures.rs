//! Common test fixtures for flood-overlay tests.

/// Georeferencing of synthetic scenes.
pub mod scene {
    /// UTM zone 33N, a projected CRS in metres.
    pub const UTM_33N: u16 = 32633;

    /// WGS84 geographic.
    pub const WGS84: u16 = 4326;

    /// Upper-left corner of the UTM test scene (easting, northing).
    pub const UTM_ORIGIN: (f64, f64) = (500_000.0, 5_010_000.0);

    /// Ground sampling distance of the UTM test scene, metres.
    pub const UTM_PIXEL_SIZE: f64 = 10.0;

    /// Upper-left corner of the geographic test scene (lon, lat).
    pub const GEO_ORIGIN: (f64, f64) = (10.0, 50.0);

    /// Pixel size of the geographic test scene, degrees.
    pub const GEO_PIXEL_SIZE: f64 = 0.001;
}

/// Processing parameters used across tests.
pub mod params {
    /// Default water threshold.
    pub const THRESHOLD: f32 = 40.0;

    /// Default output width cap.
    pub const MAX_WIDTH: usize = 800;

    /// Default per-pixel ground area in m².
    pub const PIXEL_AREA_M2: f64 = 100.0;

    /// Overlay colour for water pixels.
    pub const WATER_RGBA: [u8; 4] = [255, 0, 0, 200];
}
