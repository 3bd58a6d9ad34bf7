//! Shading rasters derived from an elevation grid.
//!
//! Both rasters share the same finite-difference gradient and are independent
//! of the triangulation.

mod normal_map;
mod hillshade;

pub use normal_map::{encode_normal_rgb8, normal_map, surface_normal};
pub use hillshade::{hillshade, illumination, HillshadeOptions};

use crate::heightmap::ElevationGrid;

/// Elevation gradient `(dz/dx, dz/dy)` at a sample, with unit pixel spacing.
///
/// Central differences in the interior, one-sided differences on the edges.
/// `y` follows grid rows, so `dz/dy` is positive when elevation grows toward
/// the bottom of the image.
pub fn gradient(grid: &ElevationGrid, x: u32, y: u32) -> (f32, f32) {
    let x_prev = x.saturating_sub(1);
    let x_next = (x + 1).min(grid.width() - 1);
    let y_prev = y.saturating_sub(1);
    let y_next = (y + 1).min(grid.height() - 1);

    let dz_dx = if x_next > x_prev {
        (grid.get(x_next, y) - grid.get(x_prev, y)) / (x_next - x_prev) as f32
    } else {
        0.0
    };
    let dz_dy = if y_next > y_prev {
        (grid.get(x, y_next) - grid.get(x, y_prev)) / (y_next - y_prev) as f32
    } else {
        0.0
    };
    (dz_dx, dz_dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_of_plane() {
        let grid = ElevationGrid::from_fn(5, 4, |x, y| 0.5 * x as f32 - 0.25 * y as f32).unwrap();
        for &(x, y) in &[(0, 0), (2, 1), (4, 3)] {
            let (gx, gy) = gradient(&grid, x, y);
            assert!((gx - 0.5).abs() < 1e-6);
            assert!((gy + 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gradient_single_column() {
        let grid = ElevationGrid::from_fn(1, 3, |_, y| y as f32).unwrap();
        assert_eq!(gradient(&grid, 0, 1), (0.0, 1.0));
    }
}
