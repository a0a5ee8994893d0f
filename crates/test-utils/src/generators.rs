//! Test data generators for synthetic backscatter rasters.
//!
//! Values mimic calibrated SAR backscatter: open water returns low values,
//! land returns high ones, and 0 marks no data.

/// Backscatter of a pixel that classifies as water at the default threshold.
pub const WATER_VALUE: f32 = 20.0;

/// Backscatter of a pixel that classifies as land at the default threshold.
pub const LAND_VALUE: f32 = 120.0;

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);
/// assert_eq!(grid[10], 1.0);
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a flood scene: every pixel is `fill` except a rectangular block
/// of `block_value` with its upper-left corner at `(block_col, block_row)`.
///
/// # Example
///
/// ```
/// use test_utils::create_block_grid;
///
/// let grid = create_block_grid(4, 4, 20.0, (1, 1, 2, 2), 0.0);
/// assert_eq!(grid[0], 20.0);
/// assert_eq!(grid[5], 0.0);
/// assert_eq!(grid.iter().filter(|v| **v == 0.0).count(), 4);
/// ```
pub fn create_block_grid(
    width: usize,
    height: usize,
    fill: f32,
    block: (usize, usize, usize, usize),
    block_value: f32,
) -> Vec<f32> {
    let (block_col, block_row, block_width, block_height) = block;
    let mut data = vec![fill; width * height];
    for row in block_row..(block_row + block_height).min(height) {
        for col in block_col..(block_col + block_width).min(width) {
            data[row * width + col] = block_value;
        }
    }
    data
}

/// Creates a grid with NaN values at specified positions, `fill` elsewhere.
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    fill: f32,
    nan_positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = vec![fill; width * height];
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f32::NAN;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(3, 2);
        assert_eq!(grid, vec![0.0, 1000.0, 2000.0, 1.0, 1001.0, 2001.0]);
    }

    #[test]
    fn test_block_grid_clips_to_bounds() {
        let grid = create_block_grid(5, 5, 1.0, (3, 3, 10, 10), 0.0);
        assert_eq!(grid.iter().filter(|v| **v == 0.0).count(), 4);
    }

    #[test]
    fn test_create_grid_with_nans() {
        let grid = create_grid_with_nans(3, 3, 5.0, &[(1, 1), (9, 9)]);
        assert!(grid[4].is_nan());
        assert_eq!(grid.iter().filter(|v| v.is_nan()).count(), 1);
    }
}
