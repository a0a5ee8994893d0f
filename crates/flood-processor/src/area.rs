//! Flooded area from a water pixel count.

use crate::config::AreaPolicy;

const M2_PER_KM2: f64 = 1_000_000.0;

/// Estimated flooded area in km².
///
/// `scale` is the downsample factor in (0, 1] that produced the mask.
pub fn estimate_area_km2(
    water_pixels: usize,
    per_pixel_area_m2: f64,
    scale: f64,
    policy: AreaPolicy,
) -> f64 {
    let pixel_area = match policy {
        AreaPolicy::ScaleCompensated => per_pixel_area_m2 / (scale * scale),
        AreaPolicy::DownsampledRaw => per_pixel_area_m2,
    };
    water_pixels as f64 * pixel_area / M2_PER_KM2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_at_full_resolution() {
        for n in [0usize, 1, 7, 12_345, 1_000_000] {
            for policy in [AreaPolicy::ScaleCompensated, AreaPolicy::DownsampledRaw] {
                assert_eq!(
                    estimate_area_km2(n, 100.0, 1.0, policy),
                    n as f64 / 10_000.0
                );
            }
        }
    }

    #[test]
    fn test_scale_compensation() {
        // Half-width downsample: each output pixel stands for four inputs.
        let compensated = estimate_area_km2(2_500, 100.0, 0.5, AreaPolicy::ScaleCompensated);
        let raw = estimate_area_km2(2_500, 100.0, 0.5, AreaPolicy::DownsampledRaw);
        assert_eq!(compensated, 1.0);
        assert_eq!(raw, 0.25);
    }

    #[test]
    fn test_never_negative() {
        assert_eq!(estimate_area_km2(0, 100.0, 0.3, AreaPolicy::ScaleCompensated), 0.0);
    }
}
