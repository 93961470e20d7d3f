use std::ops::Range;

use crate::color::{PixelMask, Region};
use crate::stats::{circular_mean_hue, hex_color, std_dev, ColorAccumulator, HueAnchors};

use super::DEPTH_BINS;

/// Statistics of one bin with at least one valid pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct BinMeasurement {
    pub angle: f64,
    pub std: f64,
    pub mean_hue: f64,
    pub mean_rgb: [u8; 3],
    pub hex: String,
    pub intensity: u8,
}

/// Rows of bin `index` for an image of `height` rows.
///
/// Bins span `[H*i/100, H*(i+1)/100)`; an empty span is widened to one row
/// (clipped to the image) so short images still fill every bin.
pub fn bin_rows(index: usize, height: u32) -> Range<u32> {
    let h = height as u64;
    let n = DEPTH_BINS as u64;
    let start = (h * index as u64 / n) as u32;
    let end = (h * (index as u64 + 1) / n) as u32;
    if end > start {
        start..end
    } else {
        start..(start + 1).min(height)
    }
}

/// Measure one bin under the profile mask. `None` when no pixel is valid.
pub fn measure_bin(region: Region<'_>, anchors: HueAnchors) -> Option<BinMeasurement> {
    let mut hues = Vec::with_capacity(region.len());
    let mut color = ColorAccumulator::default();
    for (px, rgb) in region.valid_pixels(PixelMask::PROFILE) {
        hues.push(px.h as f64);
        color.push(rgb, px.v);
    }
    let mean_hue = circular_mean_hue(hues.iter().copied())?;
    let mean_rgb = color.mean_rgb();
    Some(BinMeasurement {
        angle: anchors.angle_for_hue(mean_hue),
        std: std_dev(&hues) * anchors.degrees_per_hue(),
        mean_hue,
        mean_rgb,
        hex: hex_color(mean_rgb),
        intensity: color.mean_value() as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_tile_tall_images() {
        assert_eq!(bin_rows(0, 200), 0..2);
        assert_eq!(bin_rows(99, 200), 198..200);
        let covered: u32 = (0..DEPTH_BINS).map(|i| bin_rows(i, 250).len() as u32).sum();
        assert_eq!(covered, 250);
    }

    #[test]
    fn short_images_get_one_row_per_bin() {
        assert_eq!(bin_rows(0, 7), 0..1);
        assert_eq!(bin_rows(50, 7), 3..4);
        assert_eq!(bin_rows(99, 7), 6..7);
        assert!(bin_rows(5, 0).is_empty());
    }
}
