use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::color::HUE_RANGE;
use crate::stats::median;
use crate::AnalysisError;

/// Centroid intensities closer than this are treated as tied (float noise
/// from averaging identical samples).
const INTENSITY_TIE_TOLERANCE: f64 = 1e-12;

/// Absorbs the rounding error of `H * (row / H)` before flooring.
const ROW_ROUNDING_SLACK: f64 = 1e-9;

/// Histological cartilage zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    /// Superficial zone, at the articular surface (top rows).
    #[serde(rename = "SZ")]
    Superficial,
    /// Middle (transitional) zone.
    #[serde(rename = "MZ")]
    Middle,
    /// Deep zone, next to the bone (bottom rows).
    #[serde(rename = "DZ")]
    Deep,
}

impl Zone {
    /// Top-to-bottom order; also the tie-break order for row voting.
    pub const ALL: [Zone; 3] = [Zone::Superficial, Zone::Middle, Zone::Deep];

    pub fn abbrev(self) -> &'static str {
        match self {
            Zone::Superficial => "SZ",
            Zone::Middle => "MZ",
            Zone::Deep => "DZ",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

/// Zone boundaries as fractions of image height.
///
/// Always satisfies `0 <= sz_boundary <= mz_boundary <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBoundaries {
    /// End of the superficial zone.
    pub sz_boundary: f64,
    /// End of the middle zone; the deep zone runs from here to the bottom.
    pub mz_boundary: f64,
}

impl Default for ZoneBoundaries {
    fn default() -> Self {
        Self {
            sz_boundary: 0.33,
            mz_boundary: 0.66,
        }
    }
}

impl ZoneBoundaries {
    /// Clamp both fractions to `[0, 1]` and pull `sz` down to `mz` if they cross.
    pub fn new(sz_boundary: f64, mz_boundary: f64) -> Self {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        let mz = clamp(mz_boundary);
        Self {
            sz_boundary: clamp(sz_boundary).min(mz),
            mz_boundary: mz,
        }
    }

    /// Boundary rows `[floor(H * sz), floor(H * mz)]`.
    ///
    /// A fraction built as `row / H` maps back to exactly `row`.
    pub fn rows(&self, height: u32) -> [u32; 2] {
        let h = height as f64;
        let row = |f: f64| ((h * f + ROW_ROUNDING_SLACK).floor() as u32).min(height);
        [row(self.sz_boundary), row(self.mz_boundary)]
    }
}

/// Cluster centers in normalized `(hue / 180, value / 255)` space, keyed by zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ZoneCentroids {
    pub sz: Vector2<f64>,
    pub mz: Vector2<f64>,
    pub dz: Vector2<f64>,
    /// Index of the SZ, MZ and DZ center in the input slice.
    pub order: [usize; 3],
}

impl ZoneCentroids {
    /// Assign roles to three cluster centers.
    ///
    /// The darkest center is MZ. Intensities equal up to float noise are
    /// broken by taking the candidate whose hue is closest to the median
    /// center hue. Of the remaining two, the lower hue is SZ.
    pub fn assign(centers: &[Vector2<f64>]) -> Result<Self, AnalysisError> {
        if centers.len() != 3 {
            return Err(AnalysisError::clustering(format!(
                "expected 3 centers, got {}",
                centers.len()
            )));
        }
        let min_v = centers.iter().map(|c| c.y).fold(f64::INFINITY, f64::min);
        let mut hues: Vec<f64> = centers.iter().map(|c| c.x).collect();
        let median_hue = median(&mut hues)
            .ok_or_else(|| AnalysisError::clustering("no center hues"))?;

        let mz_idx = (0..3)
            .filter(|&i| centers[i].y <= min_v + INTENSITY_TIE_TOLERANCE)
            .min_by(|&a, &b| {
                let da = (centers[a].x - median_hue).abs();
                let db = (centers[b].x - median_hue).abs();
                da.total_cmp(&db)
            })
            .ok_or_else(|| AnalysisError::clustering("centers have non-finite intensity"))?;

        let mut rest: Vec<usize> = (0..3).filter(|&i| i != mz_idx).collect();
        rest.sort_by(|&a, &b| centers[a].y.total_cmp(&centers[b].y));
        let (sz_idx, dz_idx) = if centers[rest[0]].x < centers[rest[1]].x {
            (rest[0], rest[1])
        } else {
            (rest[1], rest[0])
        };

        Ok(Self {
            sz: centers[sz_idx],
            mz: centers[mz_idx],
            dz: centers[dz_idx],
            order: [sz_idx, mz_idx, dz_idx],
        })
    }

    pub fn get(&self, zone: Zone) -> Vector2<f64> {
        match zone {
            Zone::Superficial => self.sz,
            Zone::Middle => self.mz,
            Zone::Deep => self.dz,
        }
    }

    /// Nearest center by Euclidean distance; ties resolve in SZ, MZ, DZ order.
    pub fn nearest(&self, feature: Vector2<f64>) -> Zone {
        let mut best = (Zone::Superficial, f64::INFINITY);
        for zone in Zone::ALL {
            let d = (feature - self.get(zone)).norm_squared();
            if d < best.1 {
                best = (zone, d);
            }
        }
        best.0
    }

    /// Center hue of `zone` in 8-bit hue units.
    pub fn hue(&self, zone: Zone) -> f64 {
        self.get(zone).x * HUE_RANGE
    }
}
