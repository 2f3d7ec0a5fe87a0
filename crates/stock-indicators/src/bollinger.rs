//! Bollinger Bands

use crate::error::{IndicatorError, Result};
use crate::window::{mean, population_std, trailing};
use serde::{Deserialize, Serialize};

/// Band window and width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    pub period: usize,
    /// Band width in standard deviations
    pub k: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self { period: 20, k: 2.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bollinger {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Bands at the last close, using the population standard deviation
pub fn bollinger(closes: &[f64], params: BollingerParams) -> Result<Bollinger> {
    IndicatorError::positive_period("period", params.period)?;
    if !params.k.is_finite() || params.k < 0.0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "band width must be a non-negative number, got {}",
            params.k
        )));
    }
    IndicatorError::require("BOLL", params.period, closes.len())?;

    let window = trailing(closes, params.period).unwrap_or(closes);
    let middle = mean(window).unwrap_or_default();
    let std = population_std(window).unwrap_or_default();
    Ok(Bollinger {
        upper: middle + params.k * std,
        middle,
        lower: middle - params.k * std,
    })
}
