use std::time::Instant;

use image::RgbImage;
use tracing::debug;

use crate::core::params::FilterParams;
use crate::core::processing::{adjust, grayscale, transform};
use crate::error::FilterError;

const CHANNELS: usize = 3;

/// Run the fixed adjustment sequence over `image` and return a new image.
///
/// Order: brightness/contrast, grayscale blend, rotation, horizontal flip.
/// Parameters are validated before any pixel is touched, and the input is
/// never modified, so a failure leaves the caller with nothing half-done.
pub fn apply(image: &RgbImage, params: &FilterParams) -> Result<RgbImage, FilterError> {
    params.validate()?;
    let rotation = params.rotation()?;
    check_raster(image)?;

    let started = Instant::now();
    let mut out = image.clone();

    adjust::apply_brightness_contrast(&mut out, params.contrast, params.brightness);
    if params.grayscale > 0 {
        grayscale::blend_grayscale(&mut out, params.grayscale);
    }
    let mut out = transform::rotate(out, rotation);
    if params.flip {
        transform::flip_horizontal(&mut out);
    }

    debug!(
        "Filter pipeline {}x{} -> {}x{} ({:?}) in {:?}",
        image.width(),
        image.height(),
        out.width(),
        out.height(),
        params,
        started.elapsed()
    );
    Ok(out)
}

/// Wrap an interleaved pixel buffer as an RGB raster, rejecting anything that
/// isn't exactly `width * height` three-channel pixels.
pub fn raster_from_raw(
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
) -> Result<RgbImage, FilterError> {
    if channels != CHANNELS {
        return Err(FilterError::Processing(format!(
            "Unsupported channel layout: expected {CHANNELS} channels, got {channels}"
        )));
    }
    let expected = expected_len(width, height)?;
    if data.len() != expected {
        return Err(FilterError::Processing(format!(
            "Pixel buffer holds {} bytes, {}x{} RGB needs {}",
            data.len(),
            width,
            height,
            expected
        )));
    }
    RgbImage::from_raw(width, height, data)
        .ok_or_else(|| FilterError::Processing("Pixel buffer rejected by image library".into()))
}

fn check_raster(image: &RgbImage) -> Result<(), FilterError> {
    let expected = expected_len(image.width(), image.height())?;
    let actual = image.as_raw().len();
    if actual != expected {
        return Err(FilterError::Processing(format!(
            "Pixel buffer holds {actual} bytes, {}x{} RGB needs {expected}",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

fn expected_len(width: u32, height: u32) -> Result<usize, FilterError> {
    if width == 0 || height == 0 {
        return Err(FilterError::Processing(format!(
            "Input image is empty ({width}x{height})"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| FilterError::Processing(format!("Image {width}x{height} is too large")))
}
