use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationConfig;
use crate::zones::ClassifierConfig;

/// Top-level analyzer configuration.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Automatic zone detection.
    pub classifier: ClassifierConfig,
    /// Anchor selection policy.
    pub calibration: CalibrationConfig,
}

impl AnalyzerConfig {
    /// Load a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let cfg: AnalyzerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.classifier.kmeans.seed, ClassifierConfig::default().kmeans.seed);
        assert_eq!(cfg.calibration.min_detected_separation, 5.0);
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("fibril-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"classifier":{"kmeans":{"seed":3}},"calibration":{"min_detected_separation":8.0}}"#,
        )
        .unwrap();
        let cfg = AnalyzerConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.classifier.kmeans.seed, 3);
        assert_eq!(cfg.calibration.min_detected_separation, 8.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AnalyzerConfig::from_json_file(Path::new("/nonexistent/fibril.json")).is_err());
    }
}
