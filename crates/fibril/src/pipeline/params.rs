use serde::{Deserialize, Serialize};

use crate::stats::HueAnchors;
use crate::zones::ZoneBoundaries;

/// Per-call analysis options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Run the zone classifier and use its boundaries (and hues, when
    /// separated enough) instead of the manual settings.
    pub use_automatic_zone_detection: bool,
    /// Hue mapped to 0°. Only used together with `forced_ninety_hue`.
    pub forced_zero_hue: Option<f64>,
    /// Hue mapped to 90°. Only used together with `forced_zero_hue`.
    pub forced_ninety_hue: Option<f64>,
    /// Manual SZ/MZ boundary as a height fraction.
    pub manual_top_boundary_fraction: f64,
    /// Manual MZ/DZ boundary as a height fraction.
    pub manual_bottom_boundary_fraction: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            use_automatic_zone_detection: true,
            forced_zero_hue: None,
            forced_ninety_hue: None,
            manual_top_boundary_fraction: 0.33,
            manual_bottom_boundary_fraction: 0.66,
        }
    }
}

impl AnalysisParams {
    /// Forced anchors, present only when both hues are given.
    pub fn forced_anchors(&self) -> Option<HueAnchors> {
        match (self.forced_zero_hue, self.forced_ninety_hue) {
            (Some(zero), Some(ninety)) => Some(HueAnchors::new(zero, ninety)),
            _ => None,
        }
    }

    /// Manual boundaries, clamped and ordered.
    pub fn manual_boundaries(&self) -> ZoneBoundaries {
        ZoneBoundaries::new(
            self.manual_top_boundary_fraction,
            self.manual_bottom_boundary_fraction,
        )
    }
}
