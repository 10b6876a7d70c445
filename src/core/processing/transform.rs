use image::{RgbImage, imageops};

use crate::types::Rotation;

/// Rotate clockwise by a whole number of quarter turns. Pixels are moved, never
/// resampled.
pub fn rotate(image: RgbImage, rotation: Rotation) -> RgbImage {
    match rotation {
        Rotation::None => image,
        Rotation::Cw90 => imageops::rotate90(&image),
        Rotation::Cw180 => imageops::rotate180(&image),
        Rotation::Cw270 => imageops::rotate270(&image),
    }
}

/// Mirror the image left-right in place.
pub fn flip_horizontal(image: &mut RgbImage) {
    imageops::flip_horizontal_in_place(image);
}
