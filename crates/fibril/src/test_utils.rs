use image::{Rgb, RgbImage};

use crate::color::hsv_to_rgb;

/// Image filled with one 8-bit HSV color.
pub(crate) fn uniform_image(width: u32, height: u32, h: u8, s: u8, v: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(hsv_to_rgb(h, s, v)))
}

/// Horizontal bands of constant color.
///
/// Each band is `(end_fraction, h, s, v)`; row `y` takes the first band with
/// `y < end_fraction * height`. Rows past the last band stay black.
pub(crate) fn banded_image(width: u32, height: u32, bands: &[(f64, u8, u8, u8)]) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| {
        bands
            .iter()
            .find(|&&(end, ..)| (y as f64) < end * height as f64)
            .map(|&(_, h, s, v)| Rgb(hsv_to_rgb(h, s, v)))
            .unwrap_or(Rgb([0, 0, 0]))
    })
}

/// Cartilage-like section: thin SZ (hue 5), MZ (hue 40), thick DZ (hue 65).
pub(crate) fn three_band_image(width: u32, height: u32) -> RgbImage {
    banded_image(
        width,
        height,
        &[(0.10, 5, 255, 200), (0.40, 40, 255, 200), (1.0, 65, 255, 200)],
    )
}
