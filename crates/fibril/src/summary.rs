//! Per-zone angle statistics and the whole-image hue histogram.

use serde::{Deserialize, Serialize};

use crate::color::{HsvImage, PixelMask, Region, HUE_RANGE};
use crate::stats::{hex_color, mean, std_dev, ColorAccumulator, HueAnchors};
use crate::zones::{Zone, ZoneBoundaries};

/// Buckets of the per-zone angle histogram: one per whole degree in `[0, 90]`.
pub const ANGLE_BUCKETS: usize = 91;

/// Angle statistics of one zone slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    /// Fraction of valid pixels in each whole-degree bucket; sums to 1
    /// unless the zone is empty.
    pub angle_histogram: Vec<f64>,
    pub mean_angle: f64,
    pub std_angle: f64,
    /// Arithmetic mean hue.
    pub mean_hue: f64,
    pub mean_rgb: [u8; 3],
    pub hex: String,
    pub mean_intensity: f64,
    pub pixel_count: usize,
}

impl ZoneSummary {
    /// Summary of a zone without valid pixels.
    pub fn empty() -> Self {
        Self {
            angle_histogram: vec![0.0; ANGLE_BUCKETS],
            mean_angle: 0.0,
            std_angle: 0.0,
            mean_hue: 0.0,
            mean_rgb: [0; 3],
            hex: hex_color([0; 3]),
            mean_intensity: 0.0,
            pixel_count: 0,
        }
    }
}

/// Summaries of the three zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummaries {
    #[serde(rename = "SZ")]
    pub sz: ZoneSummary,
    #[serde(rename = "MZ")]
    pub mz: ZoneSummary,
    #[serde(rename = "DZ")]
    pub dz: ZoneSummary,
}

impl ZoneSummaries {
    pub fn empty() -> Self {
        Self {
            sz: ZoneSummary::empty(),
            mz: ZoneSummary::empty(),
            dz: ZoneSummary::empty(),
        }
    }

    pub fn get(&self, zone: Zone) -> &ZoneSummary {
        match zone {
            Zone::Superficial => &self.sz,
            Zone::Middle => &self.mz,
            Zone::Deep => &self.dz,
        }
    }
}

/// Summarize the valid pixels of `region` under the zone-summary mask.
pub fn summarize_region(region: Region<'_>, anchors: HueAnchors) -> ZoneSummary {
    let mut hues = Vec::new();
    let mut angles = Vec::new();
    let mut color = ColorAccumulator::default();
    for (px, rgb) in region.valid_pixels(PixelMask::ZONE_SUMMARY) {
        let hue = px.h as f64;
        hues.push(hue);
        angles.push(anchors.angle_for_hue(hue));
        color.push(rgb, px.v);
    }
    if angles.is_empty() {
        return ZoneSummary::empty();
    }

    let mut histogram = vec![0.0; ANGLE_BUCKETS];
    for &a in &angles {
        let bucket = (a.floor() as usize).min(ANGLE_BUCKETS - 1);
        histogram[bucket] += 1.0;
    }
    let n = angles.len() as f64;
    for v in &mut histogram {
        *v /= n;
    }

    let mean_rgb = color.mean_rgb();
    ZoneSummary {
        angle_histogram: histogram,
        mean_angle: mean(&angles),
        std_angle: std_dev(&angles),
        mean_hue: mean(&hues),
        mean_rgb,
        hex: hex_color(mean_rgb),
        mean_intensity: color.mean_value(),
        pixel_count: color.count(),
    }
}

/// Slice `hsv` at `boundaries` and summarize each zone.
pub fn summarize_zones(
    hsv: &HsvImage,
    boundaries: ZoneBoundaries,
    anchors: HueAnchors,
) -> ZoneSummaries {
    let [sz_end, mz_end] = boundaries.rows(hsv.height());
    ZoneSummaries {
        sz: summarize_region(hsv.region(0..sz_end), anchors),
        mz: summarize_region(hsv.region(sz_end..mz_end), anchors),
        dz: summarize_region(hsv.region(mz_end..hsv.height()), anchors),
    }
}

/// Whole-image hue distribution over valid pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HueHistogram {
    /// Pixel count for each 8-bit hue `0..180`.
    pub counts: Vec<u32>,
    /// Fraction of image pixels passing the zone-summary mask.
    pub valid_fraction: f64,
}

impl HueHistogram {
    pub fn empty() -> Self {
        Self {
            counts: vec![0; HUE_RANGE as usize],
            valid_fraction: 0.0,
        }
    }

    /// Most frequent hue, `None` when no pixel was valid.
    pub fn dominant_hue(&self) -> Option<u8> {
        let (hue, &count) = self
            .counts
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))?;
        (count > 0).then_some(hue as u8)
    }
}

pub fn hue_histogram(hsv: &HsvImage) -> HueHistogram {
    let mut hist = HueHistogram::empty();
    let full = hsv.full();
    let last = hist.counts.len() - 1;
    let mut valid = 0usize;
    for px in full.valid_hsv(PixelMask::ZONE_SUMMARY) {
        hist.counts[(px.h as usize).min(last)] += 1;
        valid += 1;
    }
    if !full.is_empty() {
        hist.valid_fraction = valid as f64 / full.len() as f64;
    }
    hist
}
