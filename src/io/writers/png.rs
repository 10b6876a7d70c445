use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::error::{Error, Result};

fn write_png<W: Write>(writer: W, image: &RgbImage) -> Result<()> {
    PngEncoder::new(writer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(Error::encode)
}

/// Encode an RGB raster as PNG into memory.
pub fn encode_rgb_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_png(&mut buf, image)?;
    Ok(buf)
}

pub fn write_rgb_png(output: &Path, image: &RgbImage) -> Result<()> {
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    write_png(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}
