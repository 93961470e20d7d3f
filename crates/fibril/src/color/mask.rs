use serde::{Deserialize, Serialize};

use super::Hsv;

/// Pixel-validity policy: a pixel is valid when its value (and optionally
/// its saturation) is strictly above the given thresholds.
///
/// The three named policies are used by different components and are kept
/// distinct on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelMask {
    /// Value must exceed this.
    pub min_value: u8,
    /// Saturation must exceed this, when set.
    pub min_saturation: Option<u8>,
}

impl PixelMask {
    /// Clustering, row voting and representative-hue refinement (`V > 10`).
    pub const CLUSTERING: Self = Self {
        min_value: 10,
        min_saturation: None,
    };
    /// Depth profile and manual calibration (`V > 20`).
    pub const PROFILE: Self = Self {
        min_value: 20,
        min_saturation: None,
    };
    /// Zone summaries and the hue histogram (`V > 10 && S > 10`).
    pub const ZONE_SUMMARY: Self = Self {
        min_value: 10,
        min_saturation: Some(10),
    };

    #[inline]
    pub fn accepts(self, px: Hsv) -> bool {
        px.v > self.min_value && self.min_saturation.map_or(true, |s_min| px.s > s_min)
    }
}
