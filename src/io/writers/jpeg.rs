use jpeg_encoder::{ColorType, Encoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};

fn jpeg_dimensions(image: &RgbImage) -> Result<(u16, u16)> {
    let width = u16::try_from(image.width()).map_err(|_| Error::InvalidArgument {
        arg: "width",
        value: image.width().to_string(),
    })?;
    let height = u16::try_from(image.height()).map_err(|_| Error::InvalidArgument {
        arg: "height",
        value: image.height().to_string(),
    })?;
    Ok((width, height))
}

/// Encode an RGB raster as baseline JPEG into memory.
pub fn encode_rgb_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = jpeg_dimensions(image)?;
    let mut buf = Vec::new();
    let encoder = Encoder::new(&mut buf, quality);
    encoder
        .encode(image.as_raw(), width, height, ColorType::Rgb)
        .map_err(Error::encode)?;
    Ok(buf)
}

pub fn write_rgb_jpeg(output: &Path, image: &RgbImage, quality: u8) -> Result<()> {
    let (width, height) = jpeg_dimensions(image)?;
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let encoder = Encoder::new(&mut writer, quality);
    encoder
        .encode(image.as_raw(), width, height, ColorType::Rgb)
        .map_err(Error::encode)?;
    writer.flush()?;
    Ok(())
}
