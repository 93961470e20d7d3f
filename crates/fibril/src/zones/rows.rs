//! Per-row zone voting, label smoothing and boundary scanning.

use nalgebra::Vector2;

use super::config::ClassifierConfig;
use super::roles::{Zone, ZoneCentroids};
use crate::color::{HsvImage, PixelMask};
use crate::stats::median;

/// Zone label of one image row; `None` marks a background row with no
/// valid pixels.
pub type RowLabel = Option<Zone>;

/// Label each row by the zone whose center is nearest to the row's median
/// normalized `(hue, value)`.
pub(crate) fn vote_rows(hsv: &HsvImage, centroids: &ZoneCentroids) -> Vec<RowLabel> {
    let mut hues = Vec::with_capacity(hsv.width() as usize);
    let mut values = Vec::with_capacity(hsv.width() as usize);
    (0..hsv.height())
        .map(|y| {
            hues.clear();
            values.clear();
            for px in hsv.row(y).iter().filter(|px| PixelMask::CLUSTERING.accepts(**px)) {
                let f = px.feature();
                hues.push(f.x);
                values.push(f.y);
            }
            let h = median(&mut hues)?;
            let v = median(&mut values)?;
            Some(centroids.nearest(Vector2::new(h, v)))
        })
        .collect()
}

/// Majority filter over `[i - halfwidth, i + halfwidth)`.
///
/// Background rows neither vote nor get relabelled. Count ties resolve to
/// the earlier zone in SZ, MZ, DZ order.
pub(crate) fn smooth_labels(labels: &[RowLabel], halfwidth: usize) -> Vec<RowLabel> {
    let n = labels.len();
    (0..n)
        .map(|i| {
            labels[i]?;
            let window = &labels[i.saturating_sub(halfwidth)..(i + halfwidth).min(n)];
            let mut counts = [0usize; 3];
            for zone in window.iter().flatten() {
                counts[*zone as usize] += 1;
            }
            let mut best: RowLabel = None;
            let mut best_count = 0;
            for zone in Zone::ALL {
                if counts[zone as usize] > best_count {
                    best = Some(zone);
                    best_count = counts[zone as usize];
                }
            }
            best.or(labels[i])
        })
        .collect()
}

/// Boundary rows found by [`scan_boundaries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoundaryRows {
    pub sz_row: usize,
    pub dz_row: usize,
    pub sz_found: bool,
    pub dz_found: bool,
}

/// Locate the SZ/MZ and MZ/DZ transitions in smoothed row labels.
///
/// The SZ boundary is the first row in the scan range that leaves SZ and
/// stays out of it for `stability_rows` rows. The DZ boundary is the first
/// non-DZ row met when scanning upward from near the bottom, stopping above
/// the SZ boundary. Either falls back to its configured fraction.
pub(crate) fn scan_boundaries(smoothed: &[RowLabel], config: &ClassifierConfig) -> BoundaryRows {
    let n = smoothed.len();
    let h = n as f64;
    let is_sz = |label: &RowLabel| *label == Some(Zone::Superficial);

    let scan_start = (h * config.sz_scan_range[0]) as usize;
    let scan_end = ((h * config.sz_scan_range[1]) as usize).min(n);
    let sz_hit = (scan_start..scan_end).find(|&y| {
        let window = &smoothed[y..(y + config.stability_rows).min(n)];
        !is_sz(&smoothed[y]) && !window.iter().any(is_sz)
    });
    let sz_row = sz_hit.unwrap_or((h * config.fallback_boundaries[0]) as usize);

    let margin = (h * config.dz_scan_margin) as usize;
    let top = n.saturating_sub(margin).min(n.saturating_sub(1));
    let dz_hit = (sz_row + 1..=top)
        .rev()
        .find(|&y| smoothed[y] != Some(Zone::Deep));
    let dz_row = dz_hit.unwrap_or((h * config.fallback_boundaries[1]) as usize);

    BoundaryRows {
        sz_row,
        dz_row,
        sz_found: sz_hit.is_some(),
        dz_found: dz_hit.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: RowLabel = Some(Zone::Superficial);
    const M: RowLabel = Some(Zone::Middle);
    const D: RowLabel = Some(Zone::Deep);

    fn stripes(parts: &[(RowLabel, usize)]) -> Vec<RowLabel> {
        parts
            .iter()
            .flat_map(|&(label, n)| std::iter::repeat(label).take(n))
            .collect()
    }

    #[test]
    fn smoothing_removes_isolated_rows() {
        let mut labels = stripes(&[(S, 20), (M, 20)]);
        labels[5] = D;
        let smoothed = smooth_labels(&labels, 3);
        assert_eq!(smoothed[5], S);
        assert_eq!(smoothed.len(), labels.len());
    }

    #[test]
    fn smoothing_keeps_background_rows() {
        let labels = stripes(&[(S, 5), (None, 1), (S, 5)]);
        let smoothed = smooth_labels(&labels, 3);
        assert_eq!(smoothed[5], None);
        assert!(smoothed.iter().enumerate().all(|(i, l)| i == 5 || *l == S));
    }

    #[test]
    fn smoothing_tie_prefers_earlier_zone() {
        // Window [0, 2) for row 0 contains one DZ and one SZ.
        let labels = vec![D, S];
        assert_eq!(smooth_labels(&labels, 2)[0], S);
    }

    #[test]
    fn scan_finds_both_transitions() {
        let labels = stripes(&[(S, 20), (M, 60), (D, 120)]);
        let rows = scan_boundaries(&labels, &ClassifierConfig::default());
        assert_eq!(rows.sz_row, 20);
        assert!(rows.sz_found);
        assert_eq!(rows.dz_row, 79);
        assert!(rows.dz_found);
    }

    #[test]
    fn sz_scan_requires_a_stable_exit() {
        // A short non-SZ blip at row 12 is followed by SZ again.
        let mut labels = stripes(&[(S, 30), (M, 70)]);
        labels[12] = M;
        labels[13] = M;
        let rows = scan_boundaries(&labels, &ClassifierConfig::default());
        assert_eq!(rows.sz_row, 30);
    }

    #[test]
    fn uniform_labels_fall_back_to_defaults() {
        let labels = vec![S; 100];
        let rows = scan_boundaries(&labels, &ClassifierConfig::default());
        assert!(!rows.sz_found);
        assert_eq!(rows.sz_row, 33);
        // Every row below SZ is non-DZ, so the scan stops at its start.
        assert_eq!(rows.dz_row, 95);
        assert!(rows.dz_found);
    }

    #[test]
    fn all_deep_below_sz_falls_back_for_dz() {
        let labels = stripes(&[(S, 20), (D, 80)]);
        let cfg = ClassifierConfig::default();
        let rows = scan_boundaries(&labels, &cfg);
        assert_eq!(rows.sz_row, 20);
        assert!(rows.sz_found);
        assert_eq!(rows.dz_row, (cfg.fallback_boundaries[1] * 100.0) as usize);
        assert_eq!(rows.dz_row, 66);
        assert!(!rows.dz_found);
    }

    #[test]
    fn tiny_inputs_do_not_panic() {
        let cfg = ClassifierConfig::default();
        assert_eq!(scan_boundaries(&[], &cfg).sz_row, 0);
        let rows = scan_boundaries(&[S], &cfg);
        assert!(rows.dz_row <= 1);
        assert!(smooth_labels(&[], 3).is_empty());
    }
}
