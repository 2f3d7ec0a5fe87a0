//! Technical composite score

use crate::report::{CandlePattern, IndicatorSnapshot, PatternBias, TrendResult, clamp_score};

const BASE: i32 = 50;

/// Additive composite around a base of 50, clamped to `0..=100`
pub fn composite_score(
    trend: Option<&TrendResult>,
    indicators: &IndicatorSnapshot,
    patterns: &[CandlePattern],
) -> u8 {
    let mut score = BASE;

    if let Some(trend) = trend {
        score += trend.direction.score_bonus();
    }

    if let Some(macd) = &indicators.macd {
        if macd.is_golden_cross() {
            score += 10;
        } else if macd.histogram < 0.0 {
            score -= 5;
        }
    }

    // Oversold reads as a rebound opportunity
    if let Some(rsi) = indicators.rsi {
        if rsi < 30.0 {
            score += 10;
        } else if rsi > 70.0 {
            score -= 10;
        }
    }

    if let Some(kdj) = &indicators.kdj {
        if kdj.j < 20.0 {
            score += 5;
        } else if kdj.j > 80.0 {
            score -= 5;
        }
    }

    for pattern in patterns {
        match pattern.bias() {
            PatternBias::Bullish => score += 5,
            PatternBias::Bearish => score -= 5,
            PatternBias::Neutral => {}
        }
    }

    clamp_score(score)
}
