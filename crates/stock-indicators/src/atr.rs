//! Average True Range

use crate::error::{IndicatorError, Result};
use crate::window::{mean, trailing};

fn check_lengths(highs: &[f64], lows: &[f64], closes: &[f64]) -> Result<()> {
    if highs.len() != closes.len() || lows.len() != closes.len() {
        return Err(IndicatorError::InvalidParameter(format!(
            "high/low/close lengths differ: {}/{}/{}",
            highs.len(),
            lows.len(),
            closes.len()
        )));
    }
    Ok(())
}

/// True range of every bar
///
/// The first bar has no previous close and uses `high - low`. The three
/// columns must have the same length.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Result<Vec<f64>> {
    check_lengths(highs, lows, closes)?;
    Ok((0..closes.len())
        .map(|i| {
            let range = highs[i] - lows[i];
            if i == 0 {
                return range;
            }
            let prev = closes[i - 1];
            range.max((highs[i] - prev).abs()).max((lows[i] - prev).abs())
        })
        .collect())
}

/// Simple mean of the last `period` true ranges
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Result<f64> {
    IndicatorError::positive_period("period", period)?;
    check_lengths(highs, lows, closes)?;
    IndicatorError::require("ATR", period, closes.len())?;

    let tr = true_range(highs, lows, closes)?;
    Ok(trailing(&tr, period).and_then(mean).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_true_range_uses_gaps() {
        // Second bar gaps up: |high - prev close| dominates
        let highs = [11.0, 16.0];
        let lows = [9.0, 14.0];
        let closes = [10.0, 15.0];
        assert_eq!(true_range(&highs, &lows, &closes).unwrap(), vec![2.0, 6.0]);
    }

    #[test]
    fn test_mismatched_columns_are_rejected() {
        let closes = [10.0, 15.0, 14.0];
        let short = [11.0, 16.0];
        assert!(matches!(
            true_range(&short, &closes, &closes),
            Err(IndicatorError::InvalidParameter(_))
        ));
        assert!(matches!(
            true_range(&closes, &short, &closes),
            Err(IndicatorError::InvalidParameter(_))
        ));
        assert!(matches!(
            atr(&short, &closes, &closes, 2),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_constant_range() {
        let closes = [10.0; 20];
        let highs = [11.0; 20];
        let lows = [9.0; 20];
        assert_eq!(atr(&highs, &lows, &closes, 14).unwrap(), 2.0);
    }

    #[test]
    fn test_insufficient_data() {
        let v = [1.0; 5];
        assert!(atr(&v, &v, &v, 14).is_err());
    }
}
