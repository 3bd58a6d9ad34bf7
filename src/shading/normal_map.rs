//! Tangent-space normal map from an elevation grid.

use glam::Vec3;
use image::RgbImage;
use rayon::prelude::*;

use crate::heightmap::ElevationGrid;
use super::gradient;

/// Unit surface normal at a sample, Z pointing out of the image.
pub fn surface_normal(grid: &ElevationGrid, x: u32, y: u32, z_scale: f32) -> Vec3 {
    let (dz_dx, dz_dy) = gradient(grid, x, y);
    Vec3::new(-dz_dx * z_scale, -dz_dy * z_scale, 1.0).normalize_or_zero()
}

/// Maps each component from `[-1, 1]` to `[0, 255]`.
pub fn encode_normal_rgb8(n: Vec3) -> [u8; 3] {
    let c = (n * 0.5) + Vec3::splat(0.5);
    [
        (c.x.clamp(0.0, 1.0) * 255.0) as u8,
        (c.y.clamp(0.0, 1.0) * 255.0) as u8,
        (c.z.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

/// Builds a `W x H` RGB normal map.
pub fn normal_map(grid: &ElevationGrid, z_scale: f32) -> RgbImage {
    let (w, h) = (grid.width(), grid.height());
    let mut img = RgbImage::new(w, h);
    img.par_chunks_mut(w as usize * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                let n = surface_normal(grid, x as u32, y as u32, z_scale);
                px.copy_from_slice(&encode_normal_rgb8(n));
            }
        });
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_grid_points_straight_out() {
        let grid = ElevationGrid::filled(6, 4, 0.5).unwrap();
        let img = normal_map(&grid, 10.0);
        assert_eq!(img.dimensions(), (6, 4));
        for px in img.pixels() {
            assert_eq!(px.0, [127, 127, 255]);
        }
    }

    #[test]
    fn test_slope_tilts_normal_against_gradient() {
        // Elevation rises with x: the normal leans toward -x.
        let grid = ElevationGrid::from_fn(5, 5, |x, _| x as f32 * 0.1).unwrap();
        let n = surface_normal(&grid, 2, 2, 10.0);
        let expected = Vec3::new(-1.0, 0.0, 1.0).normalize();
        assert!((n - expected).length() < 1e-5);

        let img = normal_map(&grid, 10.0);
        let px = img.get_pixel(2, 2).0;
        assert!(px[0] < 127);
        assert_eq!(px[1], 127);
    }

    #[test]
    fn test_z_scale_strengthens_tilt() {
        let grid = ElevationGrid::from_fn(5, 5, |_, y| y as f32 * 0.1).unwrap();
        let weak = surface_normal(&grid, 2, 2, 1.0);
        let strong = surface_normal(&grid, 2, 2, 20.0);
        assert!(strong.y < weak.y);
        assert!(strong.z < weak.z);
    }

    #[test]
    fn test_encode_extremes() {
        assert_eq!(encode_normal_rgb8(Vec3::new(-1.0, 1.0, 0.0)), [0, 255, 127]);
    }
}
