//! Mean, spread, median and color accumulation.

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; `0.0` for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Median with the two middle values averaged for even lengths.
///
/// Reorders `values` in place. Returns `None` for an empty slice.
pub fn median(values: &mut [f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    let upper = *upper;
    if n % 2 == 1 {
        return Some(upper);
    }
    let lower_max = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(0.5 * (lower_max + upper))
}

/// `#rrggbb` lowercase hex string.
pub fn hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Running sums of RGB channels and value over accepted pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorAccumulator {
    sum_rgb: [u64; 3],
    sum_value: u64,
    count: usize,
}

impl ColorAccumulator {
    #[inline]
    pub fn push(&mut self, rgb: [u8; 3], value: u8) {
        for (acc, ch) in self.sum_rgb.iter_mut().zip(rgb) {
            *acc += ch as u64;
        }
        self.sum_value += value as u64;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Per-channel mean truncated toward zero; black when empty.
    pub fn mean_rgb(&self) -> [u8; 3] {
        if self.count == 0 {
            return [0; 3];
        }
        let n = self.count as u64;
        self.sum_rgb.map(|s| (s / n) as u8)
    }

    /// Mean value channel; `0.0` when empty.
    pub fn mean_value(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum_value as f64 / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn median_matches_even_and_odd_conventions() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn population_std() {
        assert_abs_diff_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
        assert_abs_diff_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn color_means_truncate() {
        let mut acc = ColorAccumulator::default();
        acc.push([10, 21, 255], 255);
        acc.push([11, 20, 254], 100);
        assert_eq!(acc.mean_rgb(), [10, 20, 254]);
        assert_abs_diff_eq!(acc.mean_value(), 177.5);
        assert_eq!(hex_color(acc.mean_rgb()), "#0a14fe");
        assert_eq!(ColorAccumulator::default().mean_rgb(), [0, 0, 0]);
    }
}
