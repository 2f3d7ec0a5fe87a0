//! Trailing-window helpers over plain numeric slices

/// The last `n` values, or `None` when `n` is zero or exceeds the slice
pub fn trailing(values: &[f64], n: usize) -> Option<&[f64]> {
    if n == 0 || values.len() < n {
        return None;
    }
    Some(&values[values.len() - n..])
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Largest value, `None` for an empty slice
pub fn highest(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Smallest value, `None` for an empty slice
pub fn lowest(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Population standard deviation (divides by N), `None` for an empty slice
pub fn population_std(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(trailing(&v, 2), Some(&[3.0, 4.0][..]));
        assert_eq!(trailing(&v, 4), Some(&v[..]));
        assert_eq!(trailing(&v, 5), None);
        assert_eq!(trailing(&v, 0), None);
    }

    #[test]
    fn test_mean_min_max() {
        let v = [2.0, 8.0, 5.0];
        assert_eq!(mean(&v), Some(5.0));
        assert_eq!(highest(&v), Some(8.0));
        assert_eq!(lowest(&v), Some(2.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(highest(&[]), None);
    }

    #[test]
    fn test_population_std() {
        // Classic example: population std of this set is exactly 2
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std(&v).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(population_std(&[3.0, 3.0]), Some(0.0));
    }
}
