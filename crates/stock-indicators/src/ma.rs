//! Simple moving averages

use crate::error::{IndicatorError, Result};
use crate::window::{mean, trailing};
use std::collections::BTreeMap;

/// Mean of the last `period` closes
pub fn sma(closes: &[f64], period: usize) -> Result<f64> {
    IndicatorError::positive_period("period", period)?;
    IndicatorError::require("MA", period, closes.len())?;
    trailing(closes, period)
        .and_then(mean)
        .ok_or(IndicatorError::InsufficientData {
            indicator: "MA",
            required: period,
            actual: closes.len(),
        })
}

/// SMA for each requested period
///
/// Periods longer than the series, and a zero period, are left out of the map
/// rather than reported as errors.
pub fn moving_averages(closes: &[f64], periods: &[usize]) -> BTreeMap<usize, f64> {
    periods
        .iter()
        .filter_map(|&p| sma(closes, p).ok().map(|v| (p, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(sma(&closes, 5).unwrap(), 3.0);
        assert_eq!(sma(&closes, 2).unwrap(), 4.5);
        assert!(sma(&closes, 6).is_err());
    }

    #[test]
    fn test_short_periods_omitted() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        let mas = moving_averages(&closes, &[5, 10, 20, 60]);
        assert_eq!(mas.len(), 3);
        assert_eq!(mas.get(&5), Some(&28.0));
        assert!(!mas.contains_key(&60));
    }
}
