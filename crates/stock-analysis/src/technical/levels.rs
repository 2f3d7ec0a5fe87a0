//! Support and resistance from recent swing highs and lows

use crate::report::SupportResistance;

/// Bars scanned for swing points
pub const LOOKBACK: usize = 60;
/// Bars on each side a swing point must strictly exceed
const WING: usize = 2;

/// Nearest swing levels around the last close
///
/// A swing high above the close is a resistance candidate and a swing low below
/// it is a support candidate. When no candidate exists the first level falls
/// back to the close ×1.05 (resistance) or ×0.95 (support).
pub fn support_resistance(highs: &[f64], lows: &[f64], closes: &[f64]) -> Option<SupportResistance> {
    let current = *closes.last()?;
    let start = closes.len().saturating_sub(LOOKBACK);
    let highs = &highs[start.min(highs.len())..];
    let lows = &lows[start.min(lows.len())..];

    let mut resistance: Vec<f64> = swing_points(highs, |a, b| a > b)
        .filter(|&h| h > current)
        .collect();
    let mut support: Vec<f64> = swing_points(lows, |a, b| a < b)
        .filter(|&l| l < current)
        .collect();

    resistance.sort_by(f64::total_cmp);
    support.sort_by(|a, b| b.total_cmp(a));

    Some(SupportResistance {
        resistance_1: resistance.first().copied().unwrap_or(current * 1.05),
        resistance_2: resistance.get(1).copied(),
        support_1: support.first().copied().unwrap_or(current * 0.95),
        support_2: support.get(1).copied(),
    })
}

/// Values beating both neighbours on each side under `beats`
fn swing_points<'a, F>(values: &'a [f64], beats: F) -> impl Iterator<Item = f64> + 'a
where
    F: Fn(f64, f64) -> bool + 'a,
{
    let end = values.len().saturating_sub(WING);
    (WING..end).filter_map(move |i| {
        let v = values[i];
        let wins = (1..=WING).all(|d| beats(v, values[i - d]) && beats(v, values[i + d]));
        wins.then_some(v)
    })
}
