//! Relative Strength Index

use crate::error::{IndicatorError, Result};

/// RSI at the last close
///
/// Average gain and loss are simple means over the last `period` bar-to-bar
/// changes. The first bar of the series has no predecessor and contributes
/// nothing. A window with losses of zero yields 100, or 50 when gains are zero
/// as well.
pub fn rsi(closes: &[f64], period: usize) -> Result<f64> {
    IndicatorError::positive_period("period", period)?;
    IndicatorError::require("RSI", period, closes.len())?;

    let start = closes.len() - period;
    let (mut gain, mut loss) = (0.0, 0.0);
    for i in start.max(1)..closes.len() {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gain += delta;
        } else {
            loss -= delta;
        }
    }

    let avg_gain = gain / period as f64;
    let avg_loss = loss / period as f64;
    if avg_loss == 0.0 {
        return Ok(if avg_gain == 0.0 { 50.0 } else { 100.0 });
    }
    let rs = avg_gain / avg_loss;
    Ok(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_rising_is_overbought() {
        let closes: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let value = rsi(&closes, 14).unwrap();
        assert_eq!(value, 100.0);
        assert!(value > 70.0);
    }

    #[test]
    fn test_monotone_falling_is_zero() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        assert_eq!(rsi(&closes, 14).unwrap(), 0.0);
    }

    #[test]
    fn test_flat_series_is_neutral() {
        assert_eq!(rsi(&[20.0; 20], 14).unwrap(), 50.0);
    }

    #[test]
    fn test_balanced_moves() {
        // Alternating +1/-1: equal gains and losses
        let closes: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
        let value = rsi(&closes, 14).unwrap();
        assert!((value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_period_length() {
        // First bar contributes no change; 13 deltas of +1 over a 14-bar window
        let closes: Vec<f64> = (0..14).map(|i| i as f64).collect();
        assert_eq!(rsi(&closes, 14).unwrap(), 100.0);
    }

    #[test]
    fn test_bounded() {
        let closes = [10.0, 12.0, 11.0, 15.0, 14.5, 13.0, 16.0, 15.5, 17.0, 16.0];
        let value = rsi(&closes, 6).unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_insufficient_data() {
        assert!(matches!(
            rsi(&[1.0; 5], 14),
            Err(IndicatorError::InsufficientData { required: 14, actual: 5, .. })
        ));
    }
}
