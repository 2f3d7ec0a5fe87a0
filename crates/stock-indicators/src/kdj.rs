//! Stochastic KDJ oscillator

use crate::ema::ema_series;
use crate::error::{IndicatorError, Result};
use crate::window::{highest, lowest};
use serde::{Deserialize, Serialize};

/// KDJ window and smoothing spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdjParams {
    /// RSV lookback
    pub n: usize,
    /// K smoothing span
    pub m1: usize,
    /// D smoothing span
    pub m2: usize,
}

impl Default for KdjParams {
    fn default() -> Self {
        Self { n: 9, m1: 3, m2: 3 }
    }
}

/// KDJ values at the last bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kdj {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

/// KDJ at the last bar
///
/// RSV is 50 for bars before the first full `n` window and for windows whose
/// high equals their low. K and D are recursive EMAs seeded with the first
/// value; `J = 3K - 2D`.
pub fn kdj(highs: &[f64], lows: &[f64], closes: &[f64], params: KdjParams) -> Result<Kdj> {
    IndicatorError::positive_period("n", params.n)?;
    if highs.len() != closes.len() || lows.len() != closes.len() {
        return Err(IndicatorError::InvalidParameter(format!(
            "high/low/close lengths differ: {}/{}/{}",
            highs.len(),
            lows.len(),
            closes.len()
        )));
    }
    IndicatorError::require("KDJ", params.n, closes.len())?;

    let rsv: Vec<f64> = (0..closes.len())
        .map(|i| {
            if i + 1 < params.n {
                return 50.0;
            }
            let from = i + 1 - params.n;
            let low = lowest(&lows[from..=i]).unwrap_or(closes[i]);
            let high = highest(&highs[from..=i]).unwrap_or(closes[i]);
            let range = high - low;
            if range == 0.0 {
                50.0
            } else {
                (closes[i] - low) / range * 100.0
            }
        })
        .collect();

    let k_series = ema_series(&rsv, params.m1)?;
    let d_series = ema_series(&k_series, params.m2)?;

    let last = closes.len() - 1;
    let (k, d) = (k_series[last], d_series[last]);
    Ok(Kdj { k, d, j: 3.0 * k - 2.0 * d })
}
