//! Circular statistics over half-degree hues and the hue → angle map.

use serde::{Deserialize, Serialize};

use crate::color::HUE_RANGE;

/// Denominator used by the angle map when the anchors are closer than one hue unit.
const FALLBACK_DENOMINATOR: f64 = 60.0;

/// Circular mean of hues on the `[0, 180)` wheel.
///
/// Each hue is doubled onto the full circle, the unit vectors are summed, and
/// the resulting direction is halved back into `[0, 180)`. Returns `None` for
/// an empty input.
pub fn circular_mean_hue<I>(hues: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sin_sum = 0.0f64;
    let mut cos_sum = 0.0f64;
    let mut n = 0usize;
    for h in hues {
        let rad = (h * 2.0).to_radians();
        sin_sum += rad.sin();
        cos_sum += rad.cos();
        n += 1;
    }
    if n == 0 {
        return None;
    }
    let mut deg = sin_sum.atan2(cos_sum).to_degrees();
    if deg < 0.0 {
        deg += 360.0;
    }
    let hue = deg / 2.0;
    Some(if hue >= HUE_RANGE { hue - HUE_RANGE } else { hue })
}

/// Reference hues for 0° and 90° fiber orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HueAnchors {
    /// Hue mapped to 0°.
    pub zero_hue: f64,
    /// Hue mapped to 90°.
    pub ninety_hue: f64,
}

impl Default for HueAnchors {
    /// Red at 0°, green at 90°.
    fn default() -> Self {
        Self {
            zero_hue: 0.0,
            ninety_hue: 60.0,
        }
    }
}

impl HueAnchors {
    pub fn new(zero_hue: f64, ninety_hue: f64) -> Self {
        Self {
            zero_hue,
            ninety_hue,
        }
    }

    /// Absolute hue distance between the anchors.
    pub fn separation(&self) -> f64 {
        (self.ninety_hue - self.zero_hue).abs()
    }

    /// Linear hue → angle map, clamped to `[0, 90]`.
    pub fn angle_for_hue(&self, hue: f64) -> f64 {
        let denom = if self.separation() < 1.0 {
            FALLBACK_DENOMINATOR
        } else {
            self.ninety_hue - self.zero_hue
        };
        ((hue - self.zero_hue) / denom * 90.0).clamp(0.0, 90.0)
    }

    /// Degrees of orientation per hue unit, used to rescale a hue spread.
    pub fn degrees_per_hue(&self) -> f64 {
        let sep = self.separation();
        90.0 / if sep > 1.0 { sep } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn recovers_two_tight_clusters_separately() {
        let low = [9.0, 9.5, 10.0, 10.0, 10.5, 11.0];
        let high = [69.0, 69.5, 70.0, 70.0, 70.5, 71.0];
        let m_low = circular_mean_hue(low.iter().copied()).unwrap();
        let m_high = circular_mean_hue(high.iter().copied()).unwrap();
        assert!((m_low - 10.0).abs() < 2.0, "low mean {}", m_low);
        assert!((m_high - 70.0).abs() < 2.0, "high mean {}", m_high);
    }

    #[test]
    fn mean_respects_red_wraparound() {
        let m = circular_mean_hue([178.0, 179.0, 1.0, 2.0]).unwrap();
        let dist = m.min(HUE_RANGE - m);
        assert!(dist < 0.5, "mean {} should sit on the red boundary", m);
    }

    #[test]
    fn mean_stays_in_hue_domain() {
        for h in [0.0, 45.0, 90.0, 135.0, 179.5] {
            let m = circular_mean_hue([h]).unwrap();
            assert!((0.0..HUE_RANGE).contains(&m));
            assert_abs_diff_eq!(m, h, epsilon = 1e-9);
        }
        assert!(circular_mean_hue(std::iter::empty()).is_none());
    }

    #[test]
    fn angle_is_clamped_to_quarter_turn() {
        let a = HueAnchors::new(5.0, 65.0);
        assert_abs_diff_eq!(a.angle_for_hue(5.0), 0.0);
        assert_abs_diff_eq!(a.angle_for_hue(35.0), 45.0);
        assert_abs_diff_eq!(a.angle_for_hue(65.0), 90.0);
        assert_abs_diff_eq!(a.angle_for_hue(0.0), 0.0);
        assert_abs_diff_eq!(a.angle_for_hue(179.0), 90.0);
        for h in 0..180 {
            let angle = a.angle_for_hue(h as f64);
            assert!((0.0..=90.0).contains(&angle));
        }
    }

    #[test]
    fn reversed_anchors_map_the_other_way() {
        let a = HueAnchors::new(65.0, 5.0);
        assert_abs_diff_eq!(a.angle_for_hue(65.0), 0.0);
        assert_abs_diff_eq!(a.angle_for_hue(5.0), 90.0);
    }

    #[test]
    fn coincident_anchors_use_fallback_denominator() {
        let a = HueAnchors::new(40.0, 40.3);
        assert_abs_diff_eq!(a.angle_for_hue(40.0), 0.0);
        assert_abs_diff_eq!(a.angle_for_hue(70.0), 45.0);
        assert_abs_diff_eq!(a.degrees_per_hue(), 90.0);
    }
}
