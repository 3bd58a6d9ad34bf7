//! PNG export for shading rasters.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{GrayImage, ImageEncoder, RgbImage};

use super::ExportError;

/// Writes an 8-bit RGB image, e.g. a normal map.
pub fn write_rgb_png(img: &RgbImage, path: &Path) -> Result<(), ExportError> {
    encode(img.as_raw(), img.width(), img.height(), image::ExtendedColorType::Rgb8, path)
}

/// Writes an 8-bit grayscale image, e.g. a hillshade.
pub fn write_gray_png(img: &GrayImage, path: &Path) -> Result<(), ExportError> {
    encode(img.as_raw(), img.width(), img.height(), image::ExtendedColorType::L8, path)
}

fn encode(
    data: &[u8],
    width: u32,
    height: u32,
    color: image::ExtendedColorType,
    path: &Path,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(data, width, height, color)?;
    Ok(())
}
