//! 100-bin depth profile of fiber orientation.

mod bins;
mod fill;

use serde::{Deserialize, Serialize};

use crate::color::HsvImage;
use crate::stats::HueAnchors;

pub use bins::{bin_rows, measure_bin, BinMeasurement};
pub use fill::fill_gaps;

/// Number of equal-height depth bins.
pub const DEPTH_BINS: usize = 100;

/// How a bin's values were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinSource {
    /// Computed from the bin's own pixels.
    Measured,
    /// Averaged from the nearest measured bins on both sides.
    Interpolated,
    /// Copied from the single nearest measured bin.
    Propagated,
    /// No measured bin anywhere; all values are zero.
    Empty,
}

/// One depth bin of the orientation profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthBin {
    pub index: usize,
    /// Normalized depth of the bin center, `(2i + 1) / 200`.
    pub thickness: f64,
    /// Mean orientation angle in degrees, `[0, 90]`.
    pub angle: f64,
    /// Hue spread rescaled to degrees.
    pub std: f64,
    pub mean_hue: f64,
    pub mean_rgb: [u8; 3],
    pub hex: String,
    /// Mean value channel, truncated.
    pub intensity: u8,
    pub source: BinSource,
}

/// Normalized depth of the center of bin `index`.
pub fn bin_thickness(index: usize) -> f64 {
    (2 * index + 1) as f64 / (2 * DEPTH_BINS) as f64
}

/// Orientation profile of `hsv` under `anchors`; always [`DEPTH_BINS`] long.
pub fn depth_profile(hsv: &HsvImage, anchors: HueAnchors) -> Vec<DepthBin> {
    let measured: Vec<Option<BinMeasurement>> = (0..DEPTH_BINS)
        .map(|i| measure_bin(hsv.region(bin_rows(i, hsv.height())), anchors))
        .collect();
    let missing = measured.iter().filter(|m| m.is_none()).count();
    if missing > 0 {
        tracing::debug!(missing, "filling empty depth bins");
    }
    fill_gaps(&measured)
}
