//! High-level analysis API.
//!
//! [`Analyzer`] is the primary entry point. It owns an [`AnalyzerConfig`]
//! and an optional [`ZoneClassifier`]; when no classifier is present,
//! automatic zone detection degrades to the manual boundaries.

use image::RgbImage;

use crate::pipeline::{self, AnalysisParams, AnalysisResult};
use crate::zones::{ZoneClassifier, ZoneDetection};
use crate::{AnalysisError, AnalyzerConfig};

/// Primary analysis interface.
///
/// Create once, analyze many images.
///
/// # Examples
///
/// ```no_run
/// use fibril::{AnalysisParams, Analyzer};
///
/// let image = image::open("section.png").unwrap().to_rgb8();
/// let analyzer = Analyzer::new();
/// let result = analyzer.analyze(&image, &AnalysisParams::default());
/// println!("SZ ends at {:.1}%", result.zone_boundaries.sz_boundary * 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    classifier: Option<ZoneClassifier>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Analyzer with default configuration and classifier.
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Create with full config control.
    ///
    /// An invalid classifier configuration leaves the analyzer without a
    /// classifier; analyses then fall back to manual boundaries.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        let classifier = match ZoneClassifier::new(config.classifier.clone()) {
            Ok(c) => Some(c),
            Err(err) => {
                tracing::warn!(error = %err, "zone classifier unavailable");
                None
            }
        };
        Self { config, classifier }
    }

    /// Create with an explicitly provided (or absent) classifier.
    pub fn with_classifier(config: AnalyzerConfig, classifier: Option<ZoneClassifier>) -> Self {
        Self { config, classifier }
    }

    /// Analyzer that never runs automatic zone detection.
    pub fn without_classifier(config: AnalyzerConfig) -> Self {
        Self::with_classifier(config, None)
    }

    /// Access the current configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn classifier(&self) -> Option<&ZoneClassifier> {
        self.classifier.as_ref()
    }

    /// Analyze one stained section.
    ///
    /// Never fails: degenerate input produces a result with `success = false`
    /// and an error message.
    pub fn analyze(&self, image: &RgbImage, params: &AnalysisParams) -> AnalysisResult {
        pipeline::analyze(image, &self.config, self.classifier.as_ref(), params)
    }

    /// Run zone detection alone.
    pub fn detect_zones(&self, image: &RgbImage) -> Result<ZoneDetection, AnalysisError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| AnalysisError::invalid_config("no zone classifier configured"))?;
        classifier.detect_rgb(image)
    }
}
