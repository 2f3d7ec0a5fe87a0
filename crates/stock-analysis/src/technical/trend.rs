//! Moving-average trend classification

use crate::report::{Direction, TrendDirection, TrendResult};
use stock_indicators::sma;

/// Bars inspected for trend strength
pub const STRENGTH_WINDOW: usize = 20;

/// Classify the trend at the last close
///
/// Returns `None` below 20 closes, where MA20 is undefined.
pub fn classify_trend(closes: &[f64]) -> Option<TrendResult> {
    let current_price = *closes.last()?;
    let ma5 = sma(closes, 5).ok()?;
    let ma10 = sma(closes, 10).ok()?;
    let ma20 = sma(closes, 20).ok()?;

    let short_trend = if ma5 > ma10 { Direction::Up } else { Direction::Down };
    let mid_trend = if ma10 > ma20 { Direction::Up } else { Direction::Down };
    let strength = trend_strength(closes);

    Some(TrendResult {
        direction: direction_for(strength, short_trend, mid_trend),
        short_trend,
        mid_trend,
        strength,
        current_price,
    })
}

/// Share of positive bar-to-bar returns among the trailing 20 bars
///
/// The first bar of the series has no return and counts as non-positive.
pub fn trend_strength(closes: &[f64]) -> f64 {
    let window = STRENGTH_WINDOW.min(closes.len());
    if window == 0 {
        return 0.0;
    }
    let positive = (closes.len() - window..closes.len())
        .filter(|&i| i > 0 && closes[i] > closes[i - 1])
        .count();
    positive as f64 / window as f64
}

/// Fixed decision table; thresholds are strict so boundaries fall to the weaker class
pub fn direction_for(strength: f64, short: Direction, mid: Direction) -> TrendDirection {
    use Direction::{Down, Up};

    if strength > 0.65 && short == Up && mid == Up {
        TrendDirection::StrongUp
    } else if strength > 0.55 && short == Up {
        TrendDirection::WeakUpOscillating
    } else if strength < 0.35 && short == Down && mid == Down {
        TrendDirection::StrongDown
    } else if strength < 0.45 && short == Down {
        TrendDirection::WeakDownOscillating
    } else {
        TrendDirection::Sideways
    }
}
