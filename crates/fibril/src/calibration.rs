//! Choice of the hue anchors that define 0° and 90° orientation.

use serde::{Deserialize, Serialize};

use crate::color::{HsvImage, PixelMask};
use crate::stats::{circular_mean_hue, HueAnchors};
use crate::zones::{ZoneBoundaries, ZoneHues};

/// Calibration policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Detected SZ/DZ hues closer than this are not trusted as anchors.
    pub min_detected_separation: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_detected_separation: 5.0,
        }
    }
}

/// Where the anchors of an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationSource {
    /// Both anchors supplied by the caller.
    Forced,
    /// SZ and DZ hues from automatic zone detection.
    Automatic,
    /// Circular mean hue of the top and bottom image slices.
    Manual,
}

/// Resolved anchors and their source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub anchors: HueAnchors,
    pub source: CalibrationSource,
}

/// Resolve anchors by precedence: forced, then detected, then manual.
///
/// Detected hues are used only when they are at least
/// `config.min_detected_separation` apart.
pub fn resolve_calibration(
    hsv: &HsvImage,
    forced: Option<HueAnchors>,
    detected: Option<&ZoneHues>,
    manual: ZoneBoundaries,
    config: &CalibrationConfig,
) -> Calibration {
    if let Some(anchors) = forced {
        return Calibration {
            anchors,
            source: CalibrationSource::Forced,
        };
    }
    if let Some(hues) = detected {
        if hues.anchor_separation() > config.min_detected_separation {
            return Calibration {
                anchors: HueAnchors::new(hues.sz, hues.dz),
                source: CalibrationSource::Automatic,
            };
        }
        tracing::info!(
            sz_hue = hues.sz,
            dz_hue = hues.dz,
            "detected anchors too close, using manual calibration"
        );
    }
    Calibration {
        anchors: manual_anchors(hsv, manual),
        source: CalibrationSource::Manual,
    }
}

/// Anchors from the circular mean hue above `sz_boundary` and below
/// `mz_boundary`.
///
/// A slice with no valid pixel keeps the default anchor (0 or 60).
pub fn manual_anchors(hsv: &HsvImage, boundaries: ZoneBoundaries) -> HueAnchors {
    let [top_end, bottom_start] = boundaries.rows(hsv.height());
    let slice_mean = |rows: std::ops::Range<u32>| {
        if rows.start >= rows.end {
            return None;
        }
        circular_mean_hue(
            hsv.region(rows)
                .valid_hsv(PixelMask::PROFILE)
                .map(|px| px.h as f64),
        )
    };
    let defaults = HueAnchors::default();
    HueAnchors::new(
        slice_mean(0..top_end).unwrap_or(defaults.zero_hue),
        slice_mean(bottom_start..hsv.height()).unwrap_or(defaults.ninety_hue),
    )
}
