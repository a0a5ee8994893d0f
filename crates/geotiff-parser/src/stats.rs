//! Summary statistics over a raster band.

/// Min / max / mean over finite samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    /// Finite samples that contributed to the statistics.
    pub valid_count: usize,
    /// Samples equal to 0, the no-data sentinel after decoding.
    pub zero_count: usize,
    pub total_count: usize,
}

impl RasterStats {
    /// Compute statistics; `None` if no sample is finite.
    pub fn compute(data: &[f32]) -> Option<Self> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut valid_count = 0usize;
        let mut zero_count = 0usize;

        for &v in data {
            if !v.is_finite() {
                continue;
            }
            if v == 0.0 {
                zero_count += 1;
            }
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
            valid_count += 1;
        }

        if valid_count == 0 {
            return None;
        }

        Some(Self {
            min,
            max,
            mean: sum / valid_count as f64,
            valid_count,
            zero_count,
            total_count: data.len(),
        })
    }

    /// Samples strictly between 0 and `threshold`.
    pub fn count_below(data: &[f32], threshold: f32) -> usize {
        data.iter().filter(|&&v| v > 0.0 && v < threshold).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_skip_non_finite() {
        let stats = RasterStats::compute(&[0.0, 10.0, f32::NAN, 50.0, f32::INFINITY]).unwrap();
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 50.0);
        assert_eq!(stats.valid_count, 3);
        assert_eq!(stats.zero_count, 1);
        assert_eq!(stats.total_count, 5);
        assert!((stats.mean - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_all_nan() {
        assert!(RasterStats::compute(&[f32::NAN, f32::NAN]).is_none());
        assert!(RasterStats::compute(&[]).is_none());
    }

    #[test]
    fn test_count_below_is_exclusive() {
        let data = [0.0, 0.001, 39.99, 40.0, 100.0, -5.0];
        assert_eq!(RasterStats::count_below(&data, 40.0), 2);
    }
}
