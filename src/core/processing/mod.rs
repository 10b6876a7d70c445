//! Pixel-level building blocks of the filter pipeline: the brightness/contrast
//! lookup table, grayscale blending, quarter-turn rotation and mirroring.
//! `pipeline::apply` chains them in their fixed order.
pub mod adjust;
pub mod grayscale;
pub mod pipeline;
pub mod transform;

use image::RgbImage;

/// Minimum pixel count before per-pixel loops are split across the rayon pool.
pub(crate) const PARALLEL_PIXEL_THRESHOLD: usize = 262_144; // 512x512

pub(crate) fn should_parallelize(image: &RgbImage) -> bool {
    (image.width() as usize) * (image.height() as usize) >= PARALLEL_PIXEL_THRESHOLD
}
