/// Arithmetic mean, or `None` for an empty slice.
///
/// Each value is scaled by `1/n` before summing, so finite inputs near `f64::MAX` stay finite.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    Some(values.iter().map(|v| v / n).sum())
}

/// Sample standard deviation (Bessel's correction, `ddof = 1`).
///
/// A single value has no spread and yields `0.0` instead of dividing by zero.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    if values.len() < 2 {
        return Some(0.0);
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn mean_of_empty_slice_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std_dev(&[]), None);
    }

    #[test]
    fn mean_averages_values() {
        assert!((mean(&[0.1, 0.3]).unwrap() - 0.2).abs() < EPS);
    }

    #[test]
    fn mean_of_huge_readings_does_not_overflow() {
        let m = mean(&[1e308, 1e308]).unwrap();
        assert!(m.is_finite());
        assert!((m - 1e308).abs() / 1e308 < EPS);
    }

    #[test]
    fn sample_std_dev_uses_bessel_correction() {
        // Deviations from 5.0 are -3, -1, 1, 3; sum of squares 20, divided by 3.
        let sd = sample_std_dev(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((sd - (20.0f64 / 3.0).sqrt()).abs() < EPS);
    }

    #[test]
    fn single_value_has_zero_spread() {
        assert_eq!(sample_std_dev(&[0.7]), Some(0.0));
    }
}
