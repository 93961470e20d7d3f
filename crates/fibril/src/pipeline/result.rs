use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationSource;
use crate::profile::{fill_gaps, DepthBin, DEPTH_BINS};
use crate::stats::HueAnchors;
use crate::summary::{HueHistogram, ZoneSummaries};
use crate::zones::{ZoneBoundaries, ZoneDetection};
use crate::AnalysisError;

/// Outcome of automatic zone detection within one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectionReport {
    /// Detection ran; its boundaries were used. `hues_applied` tells whether
    /// its SZ/DZ hues also became the anchors.
    Detected {
        zones: ZoneDetection,
        hues_applied: bool,
    },
    /// Detection ran and failed; manual boundaries were used.
    Failed { error: String },
    /// Detection was requested but no classifier is available.
    Unavailable,
}

/// Full analysis result for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    /// Image dimensions [width, height].
    pub image_size: [u32; 2],
    /// Boundaries used to slice the zones.
    pub zone_boundaries: ZoneBoundaries,
    /// Anchors used for the hue → angle map.
    pub calibration: HueAnchors,
    pub calibration_source: CalibrationSource,
    pub zone_summaries: ZoneSummaries,
    /// Always [`DEPTH_BINS`] entries, top to bottom.
    pub depth_profile: Vec<DepthBin>,
    pub hue_histogram: HueHistogram,
    /// Automatic detection outcome; absent when detection was not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection: Option<DetectionReport>,
    /// Failure message when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Well-formed result for an image that could not be analyzed.
    pub fn failed(width: u32, height: u32, error: &AnalysisError) -> Self {
        Self {
            success: false,
            image_size: [width, height],
            zone_boundaries: ZoneBoundaries::default(),
            calibration: HueAnchors::default(),
            calibration_source: CalibrationSource::Manual,
            zone_summaries: ZoneSummaries::empty(),
            depth_profile: fill_gaps(&vec![None; DEPTH_BINS]),
            hue_histogram: HueHistogram::empty(),
            detection: None,
            error: Some(error.to_string()),
        }
    }

    /// The zone detection, if one ran and succeeded.
    pub fn zone_detection(&self) -> Option<&ZoneDetection> {
        match &self.detection {
            Some(DetectionReport::Detected { zones, .. }) => Some(zones),
            _ => None,
        }
    }
}
