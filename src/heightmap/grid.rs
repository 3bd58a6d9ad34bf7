//! Elevation grid storage and raster loading.

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading an elevation raster.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Empty raster: {width}x{height} (try png, jpg, etc.)")]
    EmptyRaster { width: u32, height: u32 },
    #[error("Sample count {len} does not match {width}x{height}")]
    LengthMismatch { width: u32, height: u32, len: usize },
}

/// A rectangular grid of normalized elevation samples.
///
/// Samples are stored in row-major order, `y * width + x`. Values usually lie
/// in `[0, 1]` but nothing enforces it: gamma curves and borders may leave
/// the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationGrid {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl ElevationGrid {
    /// Wraps an existing sample buffer.
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> Result<Self, LoadError> {
        if width == 0 || height == 0 {
            return Err(LoadError::EmptyRaster { width, height });
        }
        if data.len() != (width as usize) * (height as usize) {
            return Err(LoadError::LengthMismatch {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Creates a grid where every sample has the same elevation.
    pub fn filled(width: u32, height: u32, value: f32) -> Result<Self, LoadError> {
        let len = (width as usize) * (height as usize);
        Self::from_vec(width, height, vec![value; len])
    }

    /// Builds a grid from a function of the sample position.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, LoadError>
    where
        F: FnMut(u32, u32) -> f32,
    {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::from_vec(width, height, data)
    }

    /// Decodes an image file into a grid.
    ///
    /// Any format the `image` crate understands is accepted. Pixels are
    /// reduced to 16-bit luminance and scaled into `[0, 1]`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let img = image::open(path)?;
        Self::from_image(&img)
    }

    /// Converts a decoded image into a grid.
    pub fn from_image(img: &DynamicImage) -> Result<Self, LoadError> {
        let luma = img.to_luma16();
        let (width, height) = luma.dimensions();
        let data = luma
            .into_raw()
            .into_iter()
            .map(|v| v as f32 / 65535.0)
            .collect();
        Self::from_vec(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of samples in the grid.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed grid; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major sample buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Row-major index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    /// Sample at a signed position, clamped to the grid edges.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let xi = x.clamp(0, self.width as i64 - 1) as u32;
        let yi = y.clamp(0, self.height as i64 - 1) as u32;
        self.get(xi, yi)
    }

    /// Minimum and maximum elevation in the grid.
    pub fn height_range(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }

    /// Replaces the whole buffer, changing the dimensions.
    pub(crate) fn replace(&mut self, width: u32, height: u32, data: Vec<f32>) {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize));
        self.width = width;
        self.height = height;
        self.data = data;
    }
}
