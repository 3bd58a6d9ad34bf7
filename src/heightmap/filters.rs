//! In-place preprocessing filters for elevation grids.

use rayon::prelude::*;

use super::grid::ElevationGrid;

impl ElevationGrid {
    /// Linearly remaps elevations so the minimum becomes 0 and the maximum 1.
    ///
    /// A constant grid is left untouched.
    pub fn auto_level(&mut self) {
        let (lo, hi) = self.height_range();
        if hi <= lo {
            return;
        }
        let range = hi - lo;
        self.data_mut().par_iter_mut().for_each(|v| {
            *v = (*v - lo) / range;
        });
    }

    /// Replaces every elevation `v` with `1 - v`.
    pub fn invert(&mut self) {
        self.data_mut().par_iter_mut().for_each(|v| {
            *v = 1.0 - *v;
        });
    }

    /// Separable Gaussian blur, horizontal pass then vertical pass.
    ///
    /// The kernel radius is `ceil(3 * sigma)`. Samples beyond the grid are
    /// clamped to the nearest edge sample. Does nothing when `sigma <= 0`.
    pub fn gaussian_blur(&mut self, sigma: f32) {
        if !(sigma > 0.0) {
            return;
        }
        let kernel = gaussian_kernel(sigma);
        let radius = (kernel.len() / 2) as i64;
        let w = self.width() as usize;
        let h = self.height() as usize;

        let src = self.data().to_vec();
        let mut tmp = vec![0.0f32; src.len()];
        tmp.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
            let line = &src[y * w..(y + 1) * w];
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for (k, &weight) in kernel.iter().enumerate() {
                    let sx = (x as i64 + k as i64 - radius).clamp(0, w as i64 - 1) as usize;
                    acc += line[sx] * weight;
                }
                *out = acc;
            }
        });

        self.data_mut()
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    let mut acc = 0.0;
                    for (k, &weight) in kernel.iter().enumerate() {
                        let sy = (y as i64 + k as i64 - radius).clamp(0, h as i64 - 1) as usize;
                        acc += tmp[sy * w + x] * weight;
                    }
                    *out = acc;
                }
            });
    }

    /// Raises every elevation to `exponent`.
    pub fn gamma_curve(&mut self, exponent: f32) {
        self.data_mut().par_iter_mut().for_each(|v| {
            *v = v.powf(exponent);
        });
    }

    /// Surrounds the grid with a flat ring `size` samples wide at elevation `height`.
    ///
    /// The grid grows to `(W + 2*size) x (H + 2*size)` and the original
    /// samples are copied unchanged into the interior.
    pub fn add_border(&mut self, size: u32, height: f32) {
        if size == 0 {
            return;
        }
        let old_w = self.width() as usize;
        let new_w = self.width() + size * 2;
        let new_h = self.height() + size * 2;
        let offset = size as usize;

        let mut data = vec![height; (new_w as usize) * (new_h as usize)];
        for (y, row) in self.data().chunks(old_w).enumerate() {
            let start = (y + offset) * new_w as usize + offset;
            data[start..start + old_w].copy_from_slice(row);
        }
        self.replace(new_w, new_h, data);
    }
}

/// Normalized 1D Gaussian weights covering `[-r, r]`, `r = ceil(3 * sigma)`.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil() as i64;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|k| (-((k * k) as f32) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}
