//! Analysis orchestration: detect → calibrate → summarize → profile.

use image::RgbImage;

use super::{AnalysisParams, AnalysisResult, DetectionReport};
use crate::calibration::{resolve_calibration, CalibrationSource};
use crate::color::HsvImage;
use crate::profile::depth_profile;
use crate::summary::{hue_histogram, summarize_zones};
use crate::zones::ZoneClassifier;
use crate::{AnalysisError, AnalyzerConfig};

fn detect(hsv: &HsvImage, classifier: Option<&ZoneClassifier>) -> DetectionReport {
    let Some(classifier) = classifier else {
        tracing::warn!("automatic zone detection requested but no classifier is available");
        return DetectionReport::Unavailable;
    };
    match classifier.detect(hsv) {
        Ok(zones) => DetectionReport::Detected {
            zones,
            hues_applied: false,
        },
        Err(err) => {
            tracing::warn!(error = %err, "zone detection failed, using manual boundaries");
            DetectionReport::Failed {
                error: err.to_string(),
            }
        }
    }
}

pub(crate) fn analyze(
    image: &RgbImage,
    config: &AnalyzerConfig,
    classifier: Option<&ZoneClassifier>,
    params: &AnalysisParams,
) -> AnalysisResult {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        tracing::warn!(width, height, "empty image");
        return AnalysisResult::failed(width, height, &AnalysisError::EmptyImage);
    }

    let hsv = HsvImage::from_rgb(image);
    let mut detection = params
        .use_automatic_zone_detection
        .then(|| detect(&hsv, classifier));

    let detected = match &detection {
        Some(DetectionReport::Detected { zones, .. }) => Some(zones),
        _ => None,
    };
    let boundaries = detected.map_or_else(|| params.manual_boundaries(), |z| z.boundaries);
    let calibration = resolve_calibration(
        &hsv,
        params.forced_anchors(),
        detected.map(|z| &z.hues),
        params.manual_boundaries(),
        &config.calibration,
    );
    if let Some(DetectionReport::Detected { hues_applied, .. }) = &mut detection {
        *hues_applied = calibration.source == CalibrationSource::Automatic;
    }
    tracing::info!(
        zero_hue = calibration.anchors.zero_hue,
        ninety_hue = calibration.anchors.ninety_hue,
        source = ?calibration.source,
        "calibration resolved"
    );

    let zone_summaries = summarize_zones(&hsv, boundaries, calibration.anchors);
    let depth_profile = depth_profile(&hsv, calibration.anchors);

    AnalysisResult {
        success: true,
        image_size: [width, height],
        zone_boundaries: boundaries,
        calibration: calibration.anchors,
        calibration_source: calibration.source,
        zone_summaries,
        depth_profile,
        hue_histogram: hue_histogram(&hsv),
        detection,
        error: None,
    }
}
