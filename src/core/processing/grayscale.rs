use image::{RgbImage, imageops};
use rayon::prelude::*;

use super::should_parallelize;

/// Blend the image towards its luma-weighted desaturated copy.
///
/// `percent` is the share of the gray image in the result: 0 leaves the
/// image untouched, 100 makes all three channels equal to the pixel's luma.
pub fn blend_grayscale(image: &mut RgbImage, percent: i32) {
    if percent <= 0 {
        return;
    }

    let weight = (percent.min(100) as f32) / 100.0;
    let keep = 1.0 - weight;
    let gray = imageops::grayscale(&*image);
    let gray = gray.as_raw();

    let blend = |(px, &luma): (&mut [u8], &u8)| {
        let luma = luma as f32 * weight;
        for c in px.iter_mut() {
            *c = (*c as f32 * keep + luma).round().clamp(0.0, 255.0) as u8;
        }
    };

    let parallel = should_parallelize(image);
    let data: &mut [u8] = image;
    if parallel {
        data.par_chunks_exact_mut(3).zip(gray.par_iter()).for_each(blend);
    } else {
        data.chunks_exact_mut(3).zip(gray.iter()).for_each(blend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Pixel, Rgb};

    fn palette() -> RgbImage {
        RgbImage::from_fn(4, 3, |x, y| Rgb([(x * 60) as u8, (y * 90) as u8, 200]))
    }

    #[test]
    fn zero_percent_is_a_no_op() {
        let original = palette();
        let mut image = original.clone();
        blend_grayscale(&mut image, 0);
        assert_eq!(image, original);
    }

    #[test]
    fn full_blend_equalizes_channels() {
        let original = palette();
        let mut image = original.clone();
        blend_grayscale(&mut image, 100);
        for (x, y, px) in image.enumerate_pixels() {
            let [r, g, b] = px.0;
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert_eq!(r, original.get_pixel(x, y).to_luma()[0]);
        }
    }

    #[test]
    fn half_blend_lands_between_color_and_gray() {
        let mut image = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        let luma = Rgb([255u8, 0, 0]).to_luma()[0] as f32;
        blend_grayscale(&mut image, 50);
        let px = image.get_pixel(0, 0);
        assert_eq!(px[0], ((255.0 + luma) / 2.0).round() as u8);
        assert_eq!(px[1], (luma / 2.0).round() as u8);
        assert_eq!(px[1], px[2]);
    }
}
