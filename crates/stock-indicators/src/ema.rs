//! Recursive exponential moving average

use crate::error::{IndicatorError, Result};
use ta::Next;
use ta::indicators::ExponentialMovingAverage;

/// EMA of every point in `values`
///
/// Smoothing factor is `2 / (span + 1)` and the average is seeded with the
/// first value, so the output has the same length as the input.
pub fn ema_series(values: &[f64], span: usize) -> Result<Vec<f64>> {
    IndicatorError::positive_period("span", span)?;
    let mut ema = ExponentialMovingAverage::new(span)?;
    Ok(values.iter().map(|&v| ema.next(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_with_first_value() {
        let out = ema_series(&[10.0, 20.0], 3).unwrap();
        // alpha = 0.5
        assert_eq!(out[0], 10.0);
        assert!((out[1] - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series() {
        let out = ema_series(&[7.0; 10], 5).unwrap();
        assert!(out.iter().all(|v| (v - 7.0).abs() < 1e-12));
    }

    #[test]
    fn test_zero_span_rejected() {
        assert!(ema_series(&[1.0], 0).is_err());
    }
}
