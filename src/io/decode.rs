use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader, RgbImage};
use tracing::debug;

use crate::error::Result;

/// An upload decoded into the pipeline's color model.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: RgbImage,
    /// Container format sniffed from the leading bytes, if recognised
    pub format: Option<ImageFormat>,
}

/// Decode an in-memory image of any supported format and convert it to 8-bit RGB.
///
/// The format is guessed from the content, never from a filename.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();
    let image = reader.decode()?.to_rgb8();
    debug!(
        "Decoded {:?} image {}x{}",
        format,
        image.width(),
        image.height()
    );
    Ok(DecodedImage { image, format })
}

pub fn decode_file(path: &Path) -> Result<DecodedImage> {
    let bytes = std::fs::read(path)?;
    decode_bytes(&bytes)
}
