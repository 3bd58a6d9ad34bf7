//! Lambertian hillshade rasters.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use image::GrayImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::heightmap::ElevationGrid;
use super::gradient;

/// Light direction for hillshading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HillshadeOptions {
    /// Sun elevation above the horizon, degrees.
    pub altitude_deg: f32,
    /// Compass direction the light comes from, degrees clockwise from north
    /// (the top of the image).
    pub azimuth_deg: f32,
    /// Vertical exaggeration applied to the gradient.
    pub z_scale: f32,
}

impl Default for HillshadeOptions {
    fn default() -> Self {
        Self {
            altitude_deg: 45.0,
            azimuth_deg: 0.0,
            z_scale: 1.0,
        }
    }
}

/// Illumination in `[-1, 1]` for a gradient under the given light.
///
/// `cos(zenith) cos(slope) + sin(zenith) sin(slope) cos(azimuth - aspect)`
pub fn illumination(dz_dx: f32, dz_dy: f32, options: &HillshadeOptions) -> f32 {
    let zenith = (90.0 - options.altitude_deg).to_radians();
    // Compass bearing to math angle (counter-clockwise from east).
    let azimuth = (360.0 - options.azimuth_deg + 90.0).rem_euclid(360.0).to_radians();

    let gx = dz_dx * options.z_scale;
    let gy = dz_dy * options.z_scale;
    let slope = (gx * gx + gy * gy).sqrt().atan();

    let aspect = if gx != 0.0 {
        let a = gy.atan2(-gx);
        if a < 0.0 {
            a + TAU
        } else {
            a
        }
    } else if gy > 0.0 {
        FRAC_PI_2
    } else if gy < 0.0 {
        TAU - FRAC_PI_2
    } else {
        // Flat: sin(slope) is zero so any aspect works.
        PI
    };

    zenith.cos() * slope.cos() + zenith.sin() * slope.sin() * (azimuth - aspect).cos()
}

/// Builds a `W x H` grayscale hillshade, illumination clamped to `[0, 255]`.
pub fn hillshade(grid: &ElevationGrid, options: &HillshadeOptions) -> GrayImage {
    let (w, h) = (grid.width(), grid.height());
    let mut img = GrayImage::new(w, h);
    img.par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                let (dz_dx, dz_dy) = gradient(grid, x as u32, y as u32);
                let v = illumination(dz_dx, dz_dy, options);
                *px = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        });
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_terrain_depends_only_on_altitude() {
        let grid = ElevationGrid::filled(4, 4, 0.3).unwrap();
        for &azimuth_deg in &[0.0, 135.0, 315.0] {
            let img = hillshade(
                &grid,
                &HillshadeOptions { altitude_deg: 45.0, azimuth_deg, z_scale: 5.0 },
            );
            assert!(img.pixels().all(|p| p.0[0] == 180));
        }
        let overhead = hillshade(
            &grid,
            &HillshadeOptions { altitude_deg: 90.0, ..Default::default() },
        );
        assert!(overhead.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_slope_facing_light_is_brighter() {
        // Rises toward the east: faces west.
        let options_west = HillshadeOptions { altitude_deg: 30.0, azimuth_deg: 270.0, z_scale: 1.0 };
        let options_east = HillshadeOptions { azimuth_deg: 90.0, ..options_west };
        let lit = illumination(0.5, 0.0, &options_west);
        let dark = illumination(0.5, 0.0, &options_east);
        assert!(lit > dark);
        assert!(lit > illumination(0.0, 0.0, &options_west));
    }

    #[test]
    fn test_north_light_on_north_facing_slope() {
        // Elevation grows with row index (southward): the slope faces north.
        let north = HillshadeOptions { altitude_deg: 45.0, azimuth_deg: 0.0, z_scale: 1.0 };
        let south = HillshadeOptions { azimuth_deg: 180.0, ..north };
        assert!(illumination(0.0, 1.0, &north) > illumination(0.0, 1.0, &south));
    }

    #[test]
    fn test_shadowed_faces_clamp_to_black() {
        let grid = ElevationGrid::from_fn(5, 5, |x, _| x as f32 * 10.0).unwrap();
        let img = hillshade(
            &grid,
            &HillshadeOptions { altitude_deg: 5.0, azimuth_deg: 90.0, z_scale: 1.0 },
        );
        assert_eq!(img.get_pixel(2, 2).0[0], 0);
    }
}
