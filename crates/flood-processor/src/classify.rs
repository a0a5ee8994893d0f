//! Per-pixel water classification.

use renderer::{MASK_DRY, MASK_WATER};
use serde::{Deserialize, Serialize};

/// Water iff `0 < value < water_threshold`.
///
/// The lower bound excludes the 0 no-data sentinel; NaN is never water.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub water_threshold: f32,
}

impl ThresholdPolicy {
    pub fn new(water_threshold: f32) -> Self {
        Self { water_threshold }
    }

    #[inline]
    pub fn is_water(&self, value: f32) -> bool {
        value > 0.0 && value < self.water_threshold
    }
}

/// Binary water mask; [`MASK_WATER`] for water, [`MASK_DRY`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloodMask {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl FloodMask {
    pub fn water_count(&self) -> usize {
        self.data.iter().filter(|&&m| m == MASK_WATER).count()
    }

    /// Fraction of pixels classified as water, in [0, 1].
    pub fn water_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.water_count() as f64 / self.data.len() as f64
    }

    pub fn is_water(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height && self.data[row * self.width + col] == MASK_WATER
    }
}

/// Classify every value of a `width x height` buffer.
pub fn classify(values: &[f32], width: usize, height: usize, policy: ThresholdPolicy) -> FloodMask {
    let data = values
        .iter()
        .map(|&v| if policy.is_water(v) { MASK_WATER } else { MASK_DRY })
        .collect();
    FloodMask {
        data,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        let policy = ThresholdPolicy::new(40.0);
        assert!(!policy.is_water(0.0));
        assert!(!policy.is_water(-0.0));
        assert!(!policy.is_water(40.0));
        assert!(policy.is_water(40.0 - 1e-4));
        assert!(policy.is_water(f32::MIN_POSITIVE));
        assert!(!policy.is_water(-3.0));
        assert!(!policy.is_water(f32::NAN));
        assert!(!policy.is_water(f32::INFINITY));
    }

    #[test]
    fn test_classify_counts() {
        let values = [0.0, 10.0, 39.9, 40.0, 41.0, f32::NAN];
        let mask = classify(&values, 3, 2, ThresholdPolicy::new(40.0));
        assert_eq!(
            mask.data,
            vec![MASK_DRY, MASK_WATER, MASK_WATER, MASK_DRY, MASK_DRY, MASK_DRY]
        );
        assert_eq!(mask.water_count(), 2);
        assert!((mask.water_fraction() - 1.0 / 3.0).abs() < 1e-12);
        assert!(mask.is_water(1, 0));
        assert!(!mask.is_water(0, 1));
        assert!(!mask.is_water(5, 5));
    }

    #[test]
    fn test_count_within_bounds() {
        let values: Vec<f32> = (0..1000).map(|i| (i % 80) as f32).collect();
        let mask = classify(&values, 100, 10, ThresholdPolicy::new(40.0));
        let n = mask.water_count();
        assert!(n <= 1000);
        // 1..=39 in each of 12 full cycles of 80, plus 1..=39 in the tail of 40.
        assert_eq!(n, 12 * 39 + 39);
    }
}
