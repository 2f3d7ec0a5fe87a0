//! Moving Average Convergence Divergence

use crate::ema::ema_series;
use crate::error::{IndicatorError, Result};
use serde::{Deserialize, Serialize};

/// MACD spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// MACD values at the last bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    /// Fast EMA minus slow EMA
    pub dif: f64,
    /// Signal-span EMA of DIF
    pub dea: f64,
    /// `2 * (dif - dea)`
    pub histogram: f64,
}

impl Macd {
    /// DIF above DEA *and* a positive histogram
    ///
    /// Both conditions are checked even though the histogram is derived from
    /// the difference; rounding can disagree at the boundary.
    pub fn is_golden_cross(&self) -> bool {
        self.dif > self.dea && self.histogram > 0.0
    }
}

/// MACD at the last close
///
/// Requires at least `params.slow` closes.
pub fn macd(closes: &[f64], params: MacdParams) -> Result<Macd> {
    IndicatorError::positive_period("fast", params.fast)?;
    IndicatorError::positive_period("slow", params.slow)?;
    IndicatorError::positive_period("signal", params.signal)?;
    if params.fast >= params.slow {
        return Err(IndicatorError::InvalidParameter(format!(
            "fast span {} must be shorter than slow span {}",
            params.fast, params.slow
        )));
    }
    IndicatorError::require("MACD", params.slow, closes.len())?;

    let fast = ema_series(closes, params.fast)?;
    let slow = ema_series(closes, params.slow)?;
    let dif: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let dea = ema_series(&dif, params.signal)?;

    // Lengths match the input, which is non-empty after the check above
    let last = closes.len() - 1;
    let (dif, dea) = (dif[last], dea[last]);
    Ok(Macd {
        dif,
        dea,
        histogram: 2.0 * (dif - dea),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn test_insufficient_data() {
        let err = macd(&rising(25), MacdParams::default()).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                indicator: "MACD",
                required: 26,
                actual: 25
            }
        );
        assert!(macd(&rising(26), MacdParams::default()).is_ok());
    }

    #[test]
    fn test_histogram_is_twice_the_spread() {
        let m = macd(&rising(60), MacdParams::default()).unwrap();
        assert!((m.histogram - 2.0 * (m.dif - m.dea)).abs() < 1e-12);
    }

    #[test]
    fn test_rising_series_is_golden() {
        let m = macd(&rising(60), MacdParams::default()).unwrap();
        assert!(m.dif > 0.0);
        assert!(m.is_golden_cross());
    }

    #[test]
    fn test_falling_series_is_not_golden() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let m = macd(&closes, MacdParams::default()).unwrap();
        assert!(m.dif < 0.0);
        assert!(!m.is_golden_cross());
    }

    #[test]
    fn test_golden_cross_needs_both_conditions() {
        let m = Macd {
            dif: 1.0,
            dea: 0.5,
            histogram: -0.1,
        };
        assert!(!m.is_golden_cross());

        let m = Macd {
            dif: 0.5,
            dea: 1.0,
            histogram: 0.2,
        };
        assert!(!m.is_golden_cross());
    }

    #[test]
    fn test_constant_series_is_flat() {
        let m = macd(&[50.0; 40], MacdParams::default()).unwrap();
        assert!(m.dif.abs() < 1e-12);
        assert!(m.dea.abs() < 1e-12);
        assert!(!m.is_golden_cross());
    }

    #[test]
    fn test_invalid_spans() {
        let params = MacdParams {
            fast: 26,
            slow: 12,
            signal: 9,
        };
        assert!(matches!(
            macd(&rising(60), params),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }
}
