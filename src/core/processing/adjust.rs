use image::RgbImage;
use rayon::prelude::*;

use super::should_parallelize;

/// Precompute the affine per-channel mapping `clamp(round(v * contrast + brightness))`.
///
/// Every 8-bit input has exactly one output, so a 256-entry table replaces
/// per-pixel float math.
pub fn brightness_contrast_lut(contrast: f32, brightness: i32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        let scaled = (v as f32) * contrast + brightness as f32;
        *slot = scaled.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply brightness and contrast in place. Saturates at 0 and 255.
pub fn apply_brightness_contrast(image: &mut RgbImage, contrast: f32, brightness: i32) {
    if contrast == 1.0 && brightness == 0 {
        return;
    }

    let lut = brightness_contrast_lut(contrast, brightness);
    let parallel = should_parallelize(image);
    let data: &mut [u8] = image;
    if parallel {
        data.par_iter_mut().for_each(|v| *v = lut[*v as usize]);
    } else {
        data.iter_mut().for_each(|v| *v = lut[*v as usize]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn neutral_lut_is_identity() {
        let lut = brightness_contrast_lut(1.0, 0);
        for (v, out) in lut.iter().enumerate() {
            assert_eq!(*out as usize, v);
        }
    }

    #[test]
    fn lut_saturates_instead_of_wrapping() {
        let lut = brightness_contrast_lut(1.0, 255);
        assert_eq!(lut[0], 255);
        assert_eq!(lut[255], 255);

        let lut = brightness_contrast_lut(1.0, -255);
        assert_eq!(lut[255], 0);

        let lut = brightness_contrast_lut(3.0, 0);
        assert_eq!(lut[100], 255);
        assert_eq!(lut[50], 150);
    }

    #[test]
    fn contrast_and_brightness_compose_affinely() {
        let mut image = RgbImage::from_pixel(2, 2, Rgb([10, 100, 200]));
        apply_brightness_contrast(&mut image, 0.5, 20);
        assert_eq!(image.get_pixel(1, 1), &Rgb([25, 70, 120]));
    }

    #[test]
    fn white_stays_white_under_full_brightness() {
        let mut image = RgbImage::from_pixel(3, 3, Rgb([255, 255, 255]));
        apply_brightness_contrast(&mut image, 1.0, 255);
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255]));
    }
}
