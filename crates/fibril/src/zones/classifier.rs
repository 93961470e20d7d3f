use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::config::ClassifierConfig;
use super::kmeans::kmeans;
use super::roles::{Zone, ZoneBoundaries, ZoneCentroids};
use super::rows::{scan_boundaries, smooth_labels, vote_rows};
use crate::color::{HsvImage, PixelMask, HUE_RANGE};
use crate::stats::median;
use crate::AnalysisError;

/// Representative hue of each zone in 8-bit hue units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneHues {
    pub sz: f64,
    pub mz: f64,
    pub dz: f64,
}

impl ZoneHues {
    /// Absolute hue distance between the SZ and DZ anchors.
    pub fn anchor_separation(&self) -> f64 {
        (self.dz - self.sz).abs()
    }
}

/// One cluster center in 8-bit HSV units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterCenter {
    pub zone: Zone,
    pub hue: f64,
    pub value: f64,
    /// Number of clustered pixels nearest to this center.
    pub pixels: usize,
}

/// Output of a successful automatic zone detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDetection {
    pub boundaries: ZoneBoundaries,
    /// Boundary rows `[sz, mz]` the fractions were derived from.
    pub boundary_rows: [u32; 2],
    /// Whether each boundary came from a label transition rather than the fallback.
    pub transitions_found: [bool; 2],
    pub hues: ZoneHues,
    pub centers: [ClusterCenter; 3],
    /// Sum of squared feature distances of the chosen clustering.
    pub compactness: f64,
}

/// Unsupervised three-zone classifier.
///
/// Clusters pixel `(hue, value)` features, labels rows by their nearest
/// cluster, smooths the labels and scans for the zone transitions.
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    config: ClassifierConfig,
}

impl ZoneClassifier {
    /// Validate `config` and build a classifier.
    pub fn new(config: ClassifierConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Convenience wrapper converting `image` to HSV first.
    pub fn detect_rgb(&self, image: &RgbImage) -> Result<ZoneDetection, AnalysisError> {
        self.detect(&HsvImage::from_rgb(image))
    }

    /// Detect zone boundaries and zone hues.
    pub fn detect(&self, hsv: &HsvImage) -> Result<ZoneDetection, AnalysisError> {
        if hsv.is_empty() {
            return Err(AnalysisError::EmptyImage);
        }
        let samples = hsv.feature_samples()?;
        let fit = kmeans(&samples, 3, &self.config.kmeans)?;
        let centroids = ZoneCentroids::assign(&fit.centers)?;
        tracing::debug!(
            samples = samples.len(),
            iterations = fit.iterations,
            compactness = fit.compactness,
            "zone clustering done"
        );

        let labels = vote_rows(hsv, &centroids);
        let halfwidth = self.config.smoothing_halfwidth(labels.len());
        let smoothed = smooth_labels(&labels, halfwidth);
        let rows = scan_boundaries(&smoothed, &self.config);

        let height = hsv.height();
        let h = height as f64;
        let boundaries = ZoneBoundaries::new(rows.sz_row as f64 / h, rows.dz_row as f64 / h);
        // Same rows every consumer of `boundaries` will slice at.
        let [sz_row, dz_row] = boundaries.rows(height);

        let zone_hue = |range: std::ops::Range<u32>, zone: Zone| {
            let mut hues: Vec<f64> = if range.start < range.end {
                hsv.region(range)
                    .valid_hsv(PixelMask::CLUSTERING)
                    .map(|px| px.h as f64)
                    .collect()
            } else {
                Vec::new()
            };
            median(&mut hues).unwrap_or_else(|| centroids.hue(zone))
        };
        let mut hues = ZoneHues {
            sz: zone_hue(0..sz_row, Zone::Superficial),
            mz: zone_hue(sz_row..dz_row, Zone::Middle),
            dz: zone_hue(dz_row..height, Zone::Deep),
        };
        if hues.sz > self.config.sz_hue_wrap_limit {
            tracing::debug!(sz_hue = hues.sz, "SZ hue treated as red wraparound");
            hues.sz = self.config.sz_hue_wrap_reset;
        }

        let centers = Zone::ALL.map(|zone| {
            let c = centroids.get(zone);
            ClusterCenter {
                zone,
                hue: c.x * HUE_RANGE,
                value: c.y * 255.0,
                pixels: fit.sizes[centroids.order[zone as usize]],
            }
        });

        tracing::info!(
            sz_boundary = boundaries.sz_boundary,
            mz_boundary = boundaries.mz_boundary,
            sz_hue = hues.sz,
            mz_hue = hues.mz,
            dz_hue = hues.dz,
            "zones detected"
        );

        Ok(ZoneDetection {
            boundaries,
            boundary_rows: [sz_row, dz_row],
            transitions_found: [rows.sz_found, rows.dz_found],
            hues,
            centers,
            compactness: fit.compactness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{banded_image, three_band_image, uniform_image};

    fn classifier() -> ZoneClassifier {
        ZoneClassifier::new(ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn three_band_section_is_split_near_band_edges() {
        let img = three_band_image(60, 200);
        let det = classifier().detect_rgb(&img).unwrap();

        assert_eq!(det.boundary_rows, [21, 80]);
        assert!((det.boundaries.sz_boundary - 0.105).abs() < 1e-12);
        assert!((det.boundaries.mz_boundary - 0.40).abs() < 1e-12);
        assert_eq!(det.hues.sz, 5.0);
        assert_eq!(det.hues.dz, 65.0);
        assert!(det.hues.anchor_separation() > 5.0);
        assert_eq!(det.transitions_found, [true, true]);
    }

    #[test]
    fn red_surface_band_resets_sz_hue() {
        // Surface hue 175 sits just below the red wraparound.
        let img = banded_image(
            20,
            200,
            &[(0.05, 175, 255, 200), (0.50, 40, 255, 120), (1.0, 65, 255, 200)],
        );
        let det = classifier().detect_rgb(&img).unwrap();
        assert_eq!(det.boundary_rows[0], 10);
        assert_eq!(det.hues.sz, 10.0);
    }

    #[test]
    fn detection_is_deterministic_for_a_seed() {
        let img = three_band_image(40, 120);
        let a = classifier().detect_rgb(&img).unwrap();
        let b = classifier().detect_rgb(&img).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn uniform_image_still_yields_ordered_boundaries() {
        let img = uniform_image(30, 100, 40, 255, 200);
        let det = classifier().detect_rgb(&img).unwrap();
        let b = det.boundaries;
        assert!(0.0 <= b.sz_boundary && b.sz_boundary <= b.mz_boundary && b.mz_boundary <= 1.0);
        assert_eq!(det.hues.sz, 40.0);
        assert_eq!(det.hues.dz, 40.0);
    }

    #[test]
    fn random_images_keep_boundaries_ordered() {
        use rand::prelude::*;

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..8 {
            let h = rng.gen_range(3..60);
            let img = RgbImage::from_fn(12, h, |_, _| image::Rgb(rng.gen::<[u8; 3]>()));
            let Ok(det) = classifier().detect_rgb(&img) else {
                continue;
            };
            let b = det.boundaries;
            assert!(0.0 <= b.sz_boundary, "{:?}", b);
            assert!(b.sz_boundary <= b.mz_boundary, "{:?}", b);
            assert!(b.mz_boundary <= 1.0, "{:?}", b);
        }
    }

    #[test]
    fn black_image_is_reported_empty() {
        let img = uniform_image(16, 16, 0, 0, 0);
        assert_eq!(classifier().detect_rgb(&img), Err(AnalysisError::EmptyImage));
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut cfg = ClassifierConfig::default();
        cfg.kmeans.max_iters = 0;
        assert!(ZoneClassifier::new(cfg).is_err());
    }
}
