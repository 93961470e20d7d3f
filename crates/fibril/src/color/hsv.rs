use std::ops::Range;

use image::RgbImage;
use nalgebra::Vector2;

use super::PixelMask;
use crate::AnalysisError;

/// Number of hue units on the color wheel (each unit is 2 degrees).
pub const HUE_RANGE: f64 = 180.0;

/// One pixel in 8-bit HSV: hue in `[0, 180)`, saturation and value in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    /// Normalized `(hue / 180, value / 255)` clustering feature.
    #[inline]
    pub fn feature(self) -> Vector2<f64> {
        Vector2::new(self.h as f64 / HUE_RANGE, self.v as f64 / 255.0)
    }
}

/// Convert one RGB triplet to 8-bit HSV.
///
/// Hue is computed in half-degrees and rounded half-up; negative hues in the
/// red sector wrap by +180.
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (max - min) as f32;

    let v = max;
    let s = if max == 0 {
        0
    } else {
        (255.0 * diff / max as f32 + 0.5).floor() as u8
    };
    if max == min {
        return Hsv { h: 0, s, v };
    }

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let h = if max as f32 == r {
        30.0 * (g - b) / diff
    } else if max as f32 == g {
        30.0 * (b - r) / diff + 60.0
    } else {
        30.0 * (r - g) / diff + 120.0
    };
    let mut h = (h + 0.5).floor();
    if h < 0.0 {
        h += 180.0;
    }
    if h >= 180.0 {
        h -= 180.0;
    }
    Hsv { h: h as u8, s, v }
}

/// Convert an 8-bit HSV triple back to RGB.
pub fn hsv_to_rgb(h: u8, s: u8, v: u8) -> [u8; 3] {
    let hue_deg = (h as f32 * 2.0) % 360.0;
    let v = v as f32 / 255.0;
    let s = s as f32 / 255.0;
    let c = v * s;
    let sector = hue_deg / 60.0;
    let x = c * (1.0 - ((sector % 2.0) - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |ch: f32| ((ch + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

/// HSV planes of an image, stored row-major next to the source RGB values.
#[derive(Debug, Clone)]
pub struct HsvImage {
    width: u32,
    height: u32,
    hsv: Vec<Hsv>,
    rgb: Vec<[u8; 3]>,
}

impl HsvImage {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let n = width as usize * height as usize;
        let mut hsv = Vec::with_capacity(n);
        let mut rgb = Vec::with_capacity(n);
        for px in image.pixels() {
            let [r, g, b] = px.0;
            hsv.push(rgb_to_hsv(r, g, b));
            rgb.push([r, g, b]);
        }
        Self {
            width,
            height,
            hsv,
            rgb,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// HSV pixels of one row.
    pub fn row(&self, y: u32) -> &[Hsv] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.hsv[start..start + w]
    }

    /// Contiguous block of rows `rows.start..rows.end`, clipped to the image.
    pub fn region(&self, rows: Range<u32>) -> Region<'_> {
        let end = rows.end.min(self.height);
        let start = rows.start.min(end);
        let w = self.width as usize;
        let span = start as usize * w..end as usize * w;
        Region {
            hsv: &self.hsv[span.clone()],
            rgb: &self.rgb[span],
        }
    }

    /// The whole image as one region.
    pub fn full(&self) -> Region<'_> {
        self.region(0..self.height)
    }

    /// Normalized `(hue, value)` features of every pixel passing
    /// [`PixelMask::CLUSTERING`].
    pub fn feature_samples(&self) -> Result<Vec<Vector2<f64>>, AnalysisError> {
        let samples: Vec<Vector2<f64>> = self
            .full()
            .valid_hsv(PixelMask::CLUSTERING)
            .map(Hsv::feature)
            .collect();
        if samples.is_empty() {
            return Err(AnalysisError::EmptyImage);
        }
        Ok(samples)
    }
}

/// A borrowed block of whole rows.
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    hsv: &'a [Hsv],
    rgb: &'a [[u8; 3]],
}

impl<'a> Region<'a> {
    pub fn len(&self) -> usize {
        self.hsv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hsv.is_empty()
    }

    /// HSV values of the pixels accepted by `mask`.
    pub fn valid_hsv(&self, mask: PixelMask) -> impl Iterator<Item = Hsv> + 'a {
        self.hsv.iter().copied().filter(move |&px| mask.accepts(px))
    }

    /// HSV and RGB values of the pixels accepted by `mask`.
    pub fn valid_pixels(&self, mask: PixelMask) -> impl Iterator<Item = (Hsv, [u8; 3])> + 'a {
        self.hsv
            .iter()
            .copied()
            .zip(self.rgb.iter().copied())
            .filter(move |&(px, _)| mask.accepts(px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{banded_image, uniform_image};

    #[test]
    fn primaries_map_to_half_degree_hues() {
        assert_eq!(rgb_to_hsv(255, 0, 0), Hsv { h: 0, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(0, 255, 0), Hsv { h: 60, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(0, 0, 255), Hsv { h: 120, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(255, 0, 255).h, 150);
    }

    #[test]
    fn gray_has_zero_hue_and_saturation() {
        assert_eq!(rgb_to_hsv(90, 90, 90), Hsv { h: 0, s: 0, v: 90 });
        assert_eq!(rgb_to_hsv(0, 0, 0), Hsv::default());
    }

    #[test]
    fn red_sector_wraps_below_zero() {
        // Slightly blue-ish red: raw hue is just below 0.
        let px = rgb_to_hsv(200, 0, 20);
        assert!(px.h > 170, "hue {} should wrap near 180", px.h);
    }

    #[test]
    fn inverse_conversion_recovers_calibration_hues() {
        for h in [5u8, 10, 40, 65, 70, 100, 150] {
            let [r, g, b] = hsv_to_rgb(h, 255, 200);
            let back = rgb_to_hsv(r, g, b);
            assert_eq!(back.h, h, "hue {} round-tripped to {}", h, back.h);
            assert_eq!(back.v, 200);
        }
    }

    #[test]
    fn region_is_clipped_to_image() {
        let img = uniform_image(4, 10, 40, 255, 200);
        let hsv = HsvImage::from_rgb(&img);
        assert_eq!(hsv.region(0..3).len(), 12);
        assert_eq!(hsv.region(8..50).len(), 8);
        assert!(hsv.region(12..20).is_empty());
    }

    #[test]
    fn feature_samples_skip_dark_pixels() {
        let img = banded_image(3, 10, &[(0.5, 40, 255, 200), (1.0, 40, 255, 5)]);
        let hsv = HsvImage::from_rgb(&img);
        let samples = hsv.feature_samples().unwrap();
        assert_eq!(samples.len(), 15);
        assert!((samples[0].y - 200.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn black_image_has_no_samples() {
        let img = uniform_image(8, 8, 0, 0, 0);
        let hsv = HsvImage::from_rgb(&img);
        assert_eq!(hsv.feature_samples(), Err(AnalysisError::EmptyImage));
    }
}
