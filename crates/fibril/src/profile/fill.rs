use super::bins::BinMeasurement;
use super::{bin_thickness, BinSource, DepthBin};

/// Turn per-bin measurements into a gap-free profile.
///
/// A missing bin takes the average of the nearest measured bins on each
/// side (hex from the shallower one), or a copy of the only measured
/// neighbor, or zeros when nothing was measured. Neighbors are always
/// measured bins, never previously filled ones.
pub fn fill_gaps(measured: &[Option<BinMeasurement>]) -> Vec<DepthBin> {
    measured
        .iter()
        .enumerate()
        .map(|(index, bin)| {
            if let Some(m) = bin {
                return from_measurement(index, m, BinSource::Measured);
            }
            let prev = measured[..index].iter().rev().flatten().next();
            let next = measured[index + 1..].iter().flatten().next();
            match (prev, next) {
                (Some(p), Some(n)) => DepthBin {
                    index,
                    thickness: bin_thickness(index),
                    angle: (p.angle + n.angle) / 2.0,
                    std: (p.std + n.std) / 2.0,
                    mean_hue: (p.mean_hue + n.mean_hue) / 2.0,
                    mean_rgb: [0, 1, 2].map(|c| midpoint(p.mean_rgb[c], n.mean_rgb[c])),
                    hex: p.hex.clone(),
                    intensity: midpoint(p.intensity, n.intensity),
                    source: BinSource::Interpolated,
                },
                (Some(m), None) | (None, Some(m)) => {
                    from_measurement(index, m, BinSource::Propagated)
                }
                (None, None) => empty_bin(index),
            }
        })
        .collect()
}

fn midpoint(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16) / 2) as u8
}

fn from_measurement(index: usize, m: &BinMeasurement, source: BinSource) -> DepthBin {
    DepthBin {
        index,
        thickness: bin_thickness(index),
        angle: m.angle,
        std: m.std,
        mean_hue: m.mean_hue,
        mean_rgb: m.mean_rgb,
        hex: m.hex.clone(),
        intensity: m.intensity,
        source,
    }
}

fn empty_bin(index: usize) -> DepthBin {
    DepthBin {
        index,
        thickness: bin_thickness(index),
        angle: 0.0,
        std: 0.0,
        mean_hue: 0.0,
        mean_rgb: [0; 3],
        hex: "#000000".to_string(),
        intensity: 0,
        source: BinSource::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(angle: f64, rgb: [u8; 3], intensity: u8) -> Option<BinMeasurement> {
        Some(BinMeasurement {
            angle,
            std: angle / 10.0,
            mean_hue: angle,
            mean_rgb: rgb,
            hex: crate::stats::hex_color(rgb),
            intensity,
        })
    }

    #[test]
    fn interior_gap_averages_nearest_measured_bins() {
        let bins = vec![m(10.0, [10, 20, 31], 100), None, None, m(40.0, [20, 21, 40], 151)];
        let out = fill_gaps(&bins);
        for i in [1, 2] {
            assert_eq!(out[i].source, BinSource::Interpolated);
            assert_eq!(out[i].angle, 25.0);
            assert_eq!(out[i].mean_rgb, [15, 20, 35]);
            assert_eq!(out[i].intensity, 125);
            assert_eq!(out[i].hex, out[0].hex);
        }
        assert_eq!(out[2].thickness, bin_thickness(2));
    }

    #[test]
    fn edge_gaps_copy_the_single_neighbor() {
        let bins = vec![None, m(30.0, [1, 2, 3], 9), None];
        let out = fill_gaps(&bins);
        assert_eq!(out[0].source, BinSource::Propagated);
        assert_eq!(out[0].angle, 30.0);
        assert_eq!(out[0].thickness, bin_thickness(0));
        assert_eq!(out[2].source, BinSource::Propagated);
        assert_eq!(out[2].mean_rgb, [1, 2, 3]);
    }

    #[test]
    fn nothing_measured_gives_zero_bins() {
        let out = fill_gaps(&vec![None; 5]);
        assert_eq!(out.len(), 5);
        assert!(out
            .iter()
            .all(|b| b.source == BinSource::Empty && b.hex == "#000000" && b.intensity == 0));
    }
}
