//! High-level, ergonomic library API: decode an image, run the filter pipeline
//! and encode the result, for in-memory buffers or files. Prefer these
//! entrypoints over the low-level processing modules when embedding PIXTWEAK.
use std::path::Path;

use image::RgbImage;
use tracing::info;

use crate::core::params::FilterParams;
use crate::core::processing::pipeline;
use crate::error::{Error, Result};
use crate::io::decode::{decode_bytes, decode_file};
use crate::io::writers::{encode_image, write_image};
use crate::types::OutputFormat;

/// Result of in-memory editing
#[derive(Debug, Clone)]
pub struct EditedImage {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

/// Run the filter pipeline on an already decoded raster.
pub fn apply_filters(image: &RgbImage, params: &FilterParams) -> Result<RgbImage> {
    pipeline::apply(image, params).map_err(Error::from)
}

/// Decode `input`, apply `params` and encode the result (no disk I/O).
///
/// With `format = None` the output keeps the input's format when it is PNG or
/// JPEG and falls back to PNG otherwise.
pub fn edit_bytes(
    input: &[u8],
    params: &FilterParams,
    format: Option<OutputFormat>,
    jpeg_quality: u8,
) -> Result<EditedImage> {
    // Cheap parameter check before paying for a decode
    params.validate()?;
    let decoded = decode_bytes(input)?;
    let format = format
        .or_else(|| decoded.format.map(OutputFormat::from_image_format))
        .unwrap_or(OutputFormat::Png);

    let edited = apply_filters(&decoded.image, params)?;
    let bytes = encode_image(&edited, format, jpeg_quality)?;

    Ok(EditedImage {
        width: edited.width(),
        height: edited.height(),
        format,
        bytes,
    })
}

/// Edit an image file and write the result to `output`.
///
/// The output format is `format` if given, else inferred from the output
/// extension, else the input's own format (PNG when it isn't writable).
pub fn edit_file_to_path(
    input: &Path,
    output: &Path,
    params: &FilterParams,
    format: Option<OutputFormat>,
    jpeg_quality: u8,
) -> Result<()> {
    params.validate()?;
    let decoded = decode_file(input)?;
    let format = format
        .or_else(|| OutputFormat::from_path(output))
        .or_else(|| decoded.format.map(OutputFormat::from_image_format))
        .unwrap_or(OutputFormat::Png);

    let edited = apply_filters(&decoded.image, params)?;
    write_image(output, &edited, format, jpeg_quality)?;
    info!(
        "Edited {:?} -> {:?} ({} {}x{})",
        input,
        output,
        format,
        edited.width(),
        edited.height()
    );
    Ok(())
}
