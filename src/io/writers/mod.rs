//! Encoders for pipeline output. PNG goes through the `image` crate,
//! JPEG through `jpeg-encoder`.
pub mod jpeg;
pub mod png;

use std::path::Path;

use image::RgbImage;

use crate::error::Result;
use crate::types::OutputFormat;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

pub fn encode_image(image: &RgbImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Png => png::encode_rgb_png(image),
        OutputFormat::Jpeg => jpeg::encode_rgb_jpeg(image, jpeg_quality),
    }
}

pub fn write_image(
    output: &Path,
    image: &RgbImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<()> {
    match format {
        OutputFormat::Png => png::write_rgb_png(output, image),
        OutputFormat::Jpeg => jpeg::write_rgb_jpeg(output, image, jpeg_quality),
    }
}
