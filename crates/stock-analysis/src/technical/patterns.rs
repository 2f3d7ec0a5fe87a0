//! Single-bar candlestick patterns

use crate::report::CandlePattern;
use crate::series::PriceSeries;

/// Patterns on up to three of the last five bars, most recent first
///
/// Each bar is checked against every pattern independently, so one bar can
/// match more than one. Duplicates are dropped keeping the first occurrence.
pub fn detect_patterns(series: &PriceSeries) -> Vec<CandlePattern> {
    let len = series.len();
    if len < 3 {
        return Vec::new();
    }

    let recent_start = len.saturating_sub(5);
    let recent_len = len - recent_start;
    let floor = recent_len.saturating_sub(4);

    let mut found = Vec::new();
    for offset in (floor + 1..recent_len).rev() {
        let i = recent_start + offset;
        for pattern in classify_bar(series.opens[i], series.highs[i], series.lows[i], series.closes[i]) {
            if !found.contains(&pattern) {
                found.push(pattern);
            }
        }
    }
    found
}

/// Every pattern one bar matches; empty for a zero-range bar
pub fn classify_bar(open: f64, high: f64, low: f64, close: f64) -> Vec<CandlePattern> {
    let range = high - low;
    if range == 0.0 {
        return Vec::new();
    }

    let body = (close - open).abs();
    let upper_shadow = high - open.max(close);
    let lower_shadow = open.min(close) - low;
    let body_ratio = body / range;
    let bullish = close > open;
    let bearish = close < open;

    let mut patterns = Vec::new();
    if bullish && body_ratio > 0.7 {
        patterns.push(CandlePattern::BigBullish);
    }
    if bearish && body_ratio > 0.7 {
        patterns.push(CandlePattern::BigBearish);
    }
    if body_ratio < 0.1 && upper_shadow > body && lower_shadow > body {
        patterns.push(CandlePattern::Doji);
    }

    let long_lower = lower_shadow > body * 2.0 && upper_shadow < body * 0.5;
    let long_upper = upper_shadow > body * 2.0 && lower_shadow < body * 0.5;
    if long_lower && bullish {
        patterns.push(CandlePattern::Hammer);
    }
    if long_upper && bullish {
        patterns.push(CandlePattern::InvertedHammer);
    }
    if long_upper && bearish {
        patterns.push(CandlePattern::ShootingStar);
    }
    patterns
}
