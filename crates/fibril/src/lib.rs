//! fibril — collagen fiber orientation profiling for polarized-light
//! micrographs of articular cartilage.
//!
//! The analysis stages are:
//!
//! 1. **Color** – RGB to 8-bit HSV and the pixel-validity masks.
//! 2. **Zones** – unsupervised split into superficial, middle and deep zones:
//!    k-means over `(hue, value)`, per-row voting, smoothing, boundary scan.
//! 3. **Calibration** – hue anchors for 0° and 90° (forced, detected or manual).
//! 4. **Summary** – per-zone angle histogram and color statistics.
//! 5. **Profile** – 100-bin orientation profile from surface to bone.
//!
//! # Public API
//! - [`Analyzer`] as the primary entry point
//! - [`AnalyzerConfig`] and [`ClassifierConfig`] for tuning
//! - [`AnalysisResult`] and its parts, plus CSV export and inspection images

mod api;
mod calibration;
mod color;
mod config;
mod error;
mod export;
mod overlay;
mod pipeline;
mod profile;
mod stats;
mod summary;
mod zones;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::Analyzer;
pub use calibration::{
    manual_anchors, resolve_calibration, Calibration, CalibrationConfig, CalibrationSource,
};
pub use color::{hsv_to_rgb, rgb_to_hsv, Hsv, HsvImage, PixelMask, Region, HUE_RANGE};
pub use config::AnalyzerConfig;
pub use error::AnalysisError;
pub use export::{
    profile_rows, write_profile_csv, write_zone_summary_csv, zone_for_thickness, ProfileRow,
};
pub use overlay::{
    annotate_zones, hue_heatmap, masked_image, BOUNDARY_COLOR, BOUNDARY_THICKNESS, LABEL_COLOR,
};
pub use pipeline::{AnalysisParams, AnalysisResult, DetectionReport};
pub use profile::{bin_thickness, depth_profile, BinSource, DepthBin, DEPTH_BINS};
pub use stats::{circular_mean_hue, HueAnchors};
pub use summary::{
    hue_histogram, summarize_region, summarize_zones, HueHistogram, ZoneSummaries, ZoneSummary,
    ANGLE_BUCKETS,
};
pub use zones::{
    ClassifierConfig, ClusterCenter, KMeansConfig, RowLabel, Zone, ZoneBoundaries,
    ZoneClassifier, ZoneDetection, ZoneHues,
};
