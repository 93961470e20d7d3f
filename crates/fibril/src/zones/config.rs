use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Restarted k-means parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Maximum Lloyd iterations per restart.
    pub max_iters: usize,
    /// Convergence tolerance on the largest center shift (normalized units).
    pub epsilon: f64,
    /// Number of k-means++ restarts; the most compact one wins.
    pub attempts: usize,
    /// Seed for the restart RNG. Identical seeds give identical clusterings.
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iters: 20,
            epsilon: 1e-4,
            attempts: 10,
            seed: 42,
        }
    }
}

/// Zone classifier configuration: clustering, row smoothing and boundary scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Clustering parameters.
    pub kmeans: KMeansConfig,
    /// Smoothing half-window as a fraction of image height.
    pub smoothing_fraction: f64,
    /// Lower bound on the smoothing half-window (rows).
    pub min_smoothing_halfwidth: usize,
    /// Forward scan range `[start, end)` for the SZ boundary, as height fractions.
    pub sz_scan_range: [f64; 2],
    /// Consecutive non-SZ rows required to accept the SZ boundary.
    pub stability_rows: usize,
    /// The DZ scan starts this fraction of the height above the bottom row.
    pub dz_scan_margin: f64,
    /// Boundaries used when a scan finds no transition `[sz, mz]`.
    pub fallback_boundaries: [f64; 2],
    /// A refined SZ hue above this is treated as red wraparound.
    pub sz_hue_wrap_limit: f64,
    /// Replacement SZ hue after a wraparound reset.
    pub sz_hue_wrap_reset: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kmeans: KMeansConfig::default(),
            smoothing_fraction: 0.05,
            min_smoothing_halfwidth: 3,
            sz_scan_range: [0.05, 0.60],
            stability_rows: 5,
            dz_scan_margin: 0.05,
            fallback_boundaries: [0.33, 0.66],
            sz_hue_wrap_limit: 100.0,
            sz_hue_wrap_reset: 10.0,
        }
    }
}

impl ClassifierConfig {
    /// Smoothing half-window for an image of `height` rows.
    pub fn smoothing_halfwidth(&self, height: usize) -> usize {
        ((height as f64 * self.smoothing_fraction) as usize).max(self.min_smoothing_halfwidth)
    }

    pub(crate) fn validate(&self) -> Result<(), AnalysisError> {
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if self.kmeans.attempts == 0 {
            return Err(AnalysisError::invalid_config("kmeans.attempts must be >= 1"));
        }
        if self.kmeans.max_iters == 0 {
            return Err(AnalysisError::invalid_config("kmeans.max_iters must be >= 1"));
        }
        if !(self.kmeans.epsilon.is_finite() && self.kmeans.epsilon >= 0.0) {
            return Err(AnalysisError::invalid_config(
                "kmeans.epsilon must be finite and non-negative",
            ));
        }
        if self.stability_rows == 0 {
            return Err(AnalysisError::invalid_config("stability_rows must be >= 1"));
        }
        let [scan_start, scan_end] = self.sz_scan_range;
        if !(unit(scan_start) && unit(scan_end) && scan_start <= scan_end) {
            return Err(AnalysisError::invalid_config(format!(
                "sz_scan_range must be an ordered range inside [0, 1], got [{}, {}]",
                scan_start, scan_end
            )));
        }
        let fractions = [
            ("smoothing_fraction", self.smoothing_fraction),
            ("dz_scan_margin", self.dz_scan_margin),
            ("fallback_boundaries[0]", self.fallback_boundaries[0]),
            ("fallback_boundaries[1]", self.fallback_boundaries[1]),
        ];
        for (name, value) in fractions {
            if !unit(value) {
                return Err(AnalysisError::invalid_config(format!(
                    "{} must be inside [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
