//! Worst-sample search inside a triangle footprint.

use glam::IVec2;

use crate::heightmap::ElevationGrid;
use super::predicates::orient2d;

/// The sample with the largest interpolation error inside one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Grid position of the worst sample.
    pub pixel: IVec2,
    /// Absolute difference between the sample and the planar interpolation.
    pub error: f32,
}

impl Candidate {
    /// Candidate for a triangle that approximates its footprint exactly.
    pub fn none(at: IVec2) -> Self {
        Self { pixel: at, error: 0.0 }
    }
}

/// Scans every grid sample covered by the counter-clockwise triangle `abc`
/// (edges included) and returns the one farthest from the plane through the
/// three vertices.
///
/// Ties keep the first sample in row-major order. The triangle's own
/// vertices are never returned as candidates.
pub fn find_candidate(grid: &ElevationGrid, a: IVec2, b: IVec2, c: IVec2) -> Candidate {
    let area = orient2d(a, b, c);
    debug_assert!(area > 0, "triangle must be counter-clockwise and non-degenerate");
    if area <= 0 {
        return Candidate::none(a);
    }

    let min = a.min(b).min(c);
    let max = a.max(b).max(c);

    let za = grid.get(a.x as u32, a.y as u32) as f64;
    let zb = grid.get(b.x as u32, b.y as u32) as f64;
    let zc = grid.get(c.x as u32, c.y as u32) as f64;
    let inv_area = 1.0 / area as f64;

    // Edge-function steps per unit x and per unit y.
    let (ax_step, ay_step) = ((b.y - c.y) as i64, (c.x - b.x) as i64);
    let (bx_step, by_step) = ((c.y - a.y) as i64, (a.x - c.x) as i64);
    let (cx_step, cy_step) = ((a.y - b.y) as i64, (b.x - a.x) as i64);

    let mut row_wa = orient2d(b, c, min);
    let mut row_wb = orient2d(c, a, min);
    let mut row_wc = orient2d(a, b, min);

    let mut best = Candidate::none(a);

    for y in min.y..=max.y {
        let (mut wa, mut wb, mut wc) = (row_wa, row_wb, row_wc);
        let mut was_inside = false;

        for x in min.x..=max.x {
            if wa >= 0 && wb >= 0 && wc >= 0 {
                was_inside = true;
                let p = IVec2::new(x, y);
                if p != a && p != b && p != c {
                    let z = (za * wa as f64 + zb * wb as f64 + zc * wc as f64) * inv_area;
                    let dz = (z - grid.get(x as u32, y as u32) as f64).abs() as f32;
                    if dz > best.error {
                        best = Candidate { pixel: p, error: dz };
                    }
                }
            } else if was_inside {
                break;
            }
            wa += ax_step;
            wb += bx_step;
            wc += cx_step;
        }

        row_wa += ay_step;
        row_wb += by_step;
        row_wc += cy_step;
    }

    best
}
