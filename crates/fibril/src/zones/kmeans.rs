//! Restarted k-means++ over normalized `(hue, value)` features.

use nalgebra::Vector2;
use rand::prelude::*;

use super::config::KMeansConfig;
use crate::AnalysisError;

/// Best clustering over all restarts.
#[derive(Debug, Clone)]
pub(crate) struct KMeansFit {
    pub centers: Vec<Vector2<f64>>,
    /// Samples assigned to each center in the final labelling.
    pub sizes: Vec<usize>,
    /// Sum of squared distances to the assigned centers.
    pub compactness: f64,
    pub iterations: usize,
}

/// Cluster `samples` into `k` groups.
///
/// Runs `config.attempts` restarts from k-means++ seeds drawn from one RNG
/// seeded with `config.seed`, and keeps the lowest-compactness result.
pub(crate) fn kmeans(
    samples: &[Vector2<f64>],
    k: usize,
    config: &KMeansConfig,
) -> Result<KMeansFit, AnalysisError> {
    if k == 0 {
        return Err(AnalysisError::clustering("k must be positive"));
    }
    if samples.len() < k {
        return Err(AnalysisError::clustering(format!(
            "{} samples cannot form {} clusters",
            samples.len(),
            k
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<KMeansFit> = None;

    for _ in 0..config.attempts.max(1) {
        let seeds = kmeans_pp_seeds(samples, k, &mut rng);
        let fit = lloyd(samples, seeds, config);
        let finite = fit.compactness.is_finite()
            && fit.centers.iter().all(|c| c.iter().all(|v| v.is_finite()));
        if !finite {
            continue;
        }
        if best.as_ref().map_or(true, |b| fit.compactness < b.compactness) {
            best = Some(fit);
        }
    }

    best.ok_or_else(|| AnalysisError::clustering("no restart produced finite centers"))
}

// ── Seeding ────────────────────────────────────────────────────────────────

/// k-means++: first center uniform, the rest proportional to squared distance
/// from the nearest chosen center.
fn kmeans_pp_seeds(samples: &[Vector2<f64>], k: usize, rng: &mut impl Rng) -> Vec<Vector2<f64>> {
    let n = samples.len();
    let first = samples[rng.gen_range(0..n)];
    let mut centers = Vec::with_capacity(k);
    centers.push(first);

    let mut dist2: Vec<f64> = samples.iter().map(|p| (p - first).norm_squared()).collect();
    for _ in 1..k {
        let total: f64 = dist2.iter().sum();
        let idx = if total > 0.0 {
            weighted_index(&dist2, rng.gen::<f64>() * total)
        } else {
            // All samples coincide with a chosen center.
            rng.gen_range(0..n)
        };
        let c = samples[idx];
        centers.push(c);
        for (d, p) in dist2.iter_mut().zip(samples) {
            *d = d.min((p - c).norm_squared());
        }
    }
    centers
}

fn weighted_index(weights: &[f64], mut target: f64) -> usize {
    for (i, &w) in weights.iter().enumerate() {
        if target < w {
            return i;
        }
        target -= w;
    }
    weights.len() - 1
}

// ── Lloyd iterations ───────────────────────────────────────────────────────

fn nearest(centers: &[Vector2<f64>], p: &Vector2<f64>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centers.iter().enumerate() {
        let d = (p - c).norm_squared();
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn lloyd(
    samples: &[Vector2<f64>],
    mut centers: Vec<Vector2<f64>>,
    config: &KMeansConfig,
) -> KMeansFit {
    let k = centers.len();
    let eps2 = config.epsilon * config.epsilon;
    let mut iterations = 0;

    for _ in 0..config.max_iters.max(1) {
        let mut sums = vec![Vector2::zeros(); k];
        let mut counts = vec![0usize; k];
        for p in samples {
            let (label, _) = nearest(&centers, p);
            sums[label] += p;
            counts[label] += 1;
        }

        let mut max_shift = 0.0f64;
        for ((center, sum), &count) in centers.iter_mut().zip(&sums).zip(&counts) {
            // An emptied cluster keeps its previous center.
            if count == 0 {
                continue;
            }
            let updated = sum / count as f64;
            max_shift = max_shift.max((updated - *center).norm_squared());
            *center = updated;
        }
        iterations += 1;
        if max_shift <= eps2 {
            break;
        }
    }

    let mut sizes = vec![0usize; k];
    let mut compactness = 0.0;
    for p in samples {
        let (label, d) = nearest(&centers, p);
        sizes[label] += 1;
        compactness += d;
    }

    KMeansFit {
        centers,
        sizes,
        compactness,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn blob(center: (f64, f64), n: usize, spread: f64, rng: &mut StdRng) -> Vec<Vector2<f64>> {
        (0..n)
            .map(|_| {
                Vector2::new(
                    center.0 + rng.gen_range(-spread..spread),
                    center.1 + rng.gen_range(-spread..spread),
                )
            })
            .collect()
    }

    fn three_blobs() -> Vec<Vector2<f64>> {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pts = blob((0.05, 0.8), 200, 0.01, &mut rng);
        pts.extend(blob((0.25, 0.6), 300, 0.01, &mut rng));
        pts.extend(blob((0.40, 0.7), 500, 0.01, &mut rng));
        pts
    }

    #[test]
    fn recovers_separated_blobs() {
        let pts = three_blobs();
        let fit = kmeans(&pts, 3, &KMeansConfig::default()).unwrap();

        let mut centers = fit.centers.clone();
        centers.sort_by(|a, b| a.x.total_cmp(&b.x));
        let expected = [(0.05, 0.8), (0.25, 0.6), (0.40, 0.7)];
        for (c, (x, y)) in centers.iter().zip(expected) {
            assert!((c.x - x).abs() < 0.01, "center {:?} vs {}", c, x);
            assert!((c.y - y).abs() < 0.01, "center {:?} vs {}", c, y);
        }
        let mut sizes = fit.sizes.clone();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![200, 300, 500]);
    }

    #[test]
    fn same_seed_gives_same_centers() {
        let pts = three_blobs();
        let cfg = KMeansConfig::default();
        let a = kmeans(&pts, 3, &cfg).unwrap();
        let b = kmeans(&pts, 3, &cfg).unwrap();
        assert_eq!(a.centers, b.centers);
        assert_eq!(a.compactness, b.compactness);
    }

    #[test]
    fn identical_samples_collapse_without_nan() {
        let pts = vec![Vector2::new(0.2, 0.5); 50];
        let fit = kmeans(&pts, 3, &KMeansConfig::default()).unwrap();
        for c in &fit.centers {
            assert!(c.iter().all(|v| v.is_finite()), "{:?}", c);
            assert_abs_diff_eq!(c.x, 0.2, epsilon = 1e-12);
            assert_abs_diff_eq!(c.y, 0.5, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(fit.compactness, 0.0, epsilon = 1e-20);
    }

    #[test]
    fn too_few_samples_is_an_error() {
        let pts = vec![Vector2::new(0.1, 0.1), Vector2::new(0.2, 0.2)];
        assert!(matches!(
            kmeans(&pts, 3, &KMeansConfig::default()),
            Err(AnalysisError::ClusteringFailure { .. })
        ));
    }
}
