//! Report value objects produced by the analyzers
//!
//! Reports are immutable once built. The insufficient-data variants carry no
//! sub-results, a score of 0 and an explanatory summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use stock_indicators::{Bollinger, Kdj, Macd};

/// Clamp a raw additive score into `0..=100`
pub(crate) fn clamp_score(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}

/// Direction of one moving-average comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
        })
    }
}

/// Overall price trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    StrongUp,
    WeakUpOscillating,
    Sideways,
    WeakDownOscillating,
    StrongDown,
}

impl TrendDirection {
    /// Contribution to the technical composite score
    pub fn score_bonus(self) -> i32 {
        match self {
            TrendDirection::StrongUp => 20,
            TrendDirection::WeakUpOscillating => 10,
            TrendDirection::Sideways => 0,
            TrendDirection::WeakDownOscillating => -10,
            TrendDirection::StrongDown => -20,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::StrongUp => "strong uptrend",
            TrendDirection::WeakUpOscillating => "oscillating, leaning up",
            TrendDirection::Sideways => "sideways",
            TrendDirection::WeakDownOscillating => "oscillating, leaning down",
            TrendDirection::StrongDown => "strong downtrend",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trend classification at the last bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// MA5 against MA10
    pub short_trend: Direction,
    /// MA10 against MA20
    pub mid_trend: Direction,
    /// Share of positive daily returns in the trailing 20 bars
    pub strength: f64,
    pub current_price: f64,
}

/// Indicator values at the last bar, each absent below its minimum history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub macd: Option<Macd>,
    pub kdj: Option<Kdj>,
    pub rsi: Option<f64>,
    pub bollinger: Option<Bollinger>,
    pub atr: Option<f64>,
}

impl IndicatorSnapshot {
    /// Moving average for one of the snapshot periods
    pub fn ma(&self, period: usize) -> Option<f64> {
        match period {
            5 => self.ma5,
            10 => self.ma10,
            20 => self.ma20,
            60 => self.ma60,
            _ => None,
        }
    }
}

/// Nearest price levels above and below the current close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub resistance_1: f64,
    pub resistance_2: Option<f64>,
    pub support_1: f64,
    pub support_2: Option<f64>,
}

/// Which way a candle pattern leans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternBias {
    Bullish,
    Bearish,
    Neutral,
}

/// Single-bar candlestick pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlePattern {
    BigBullish,
    BigBearish,
    Doji,
    Hammer,
    InvertedHammer,
    ShootingStar,
}

impl CandlePattern {
    pub fn bias(self) -> PatternBias {
        match self {
            CandlePattern::BigBullish | CandlePattern::Hammer | CandlePattern::InvertedHammer => {
                PatternBias::Bullish
            }
            CandlePattern::BigBearish | CandlePattern::ShootingStar => PatternBias::Bearish,
            CandlePattern::Doji => PatternBias::Neutral,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CandlePattern::BigBullish => "big bullish candle",
            CandlePattern::BigBearish => "big bearish candle",
            CandlePattern::Doji => "doji",
            CandlePattern::Hammer => "hammer",
            CandlePattern::InvertedHammer => "inverted hammer",
            CandlePattern::ShootingStar => "shooting star",
        }
    }
}

impl fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Technical analysis of one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub symbol: String,
    pub analysis_date: NaiveDate,
    pub trend: Option<TrendResult>,
    pub indicators: Option<IndicatorSnapshot>,
    pub support_resistance: Option<SupportResistance>,
    #[serde(default)]
    pub patterns: Vec<CandlePattern>,
    /// Composite score, 0..=100
    pub score: u8,
    pub summary: Option<String>,
}

impl TechnicalReport {
    /// Sentinel report for a series too short to analyze
    pub fn insufficient(symbol: impl Into<String>, analysis_date: NaiveDate, bars: usize) -> Self {
        Self {
            symbol: symbol.into(),
            analysis_date,
            trend: None,
            indicators: None,
            support_resistance: None,
            patterns: Vec::new(),
            score: 0,
            summary: Some(format!(
                "Insufficient data for technical analysis ({bars} bars available)"
            )),
        }
    }

    /// Whether this is the insufficient-data sentinel
    pub fn is_insufficient(&self) -> bool {
        self.trend.is_none() && self.indicators.is_none()
    }
}

/// Direction of a metric across recent periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricTrend {
    Rising,
    #[default]
    Stable,
    Falling,
}

impl MetricTrend {
    /// More than 10% above the older mean is rising, more than 10% below is falling
    pub fn classify(recent: f64, older: f64) -> Self {
        if recent > older * 1.1 {
            MetricTrend::Rising
        } else if recent < older * 0.9 {
            MetricTrend::Falling
        } else {
            MetricTrend::Stable
        }
    }
}

impl fmt::Display for MetricTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetricTrend::Rising => "rising",
            MetricTrend::Stable => "stable",
            MetricTrend::Falling => "falling",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    /// `None` when PE is unknown
    pub is_undervalued: Option<bool>,
    pub score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityResult {
    pub roe_current: Option<f64>,
    /// Mean ROE over the 12 most recent periods that report one
    pub roe_avg_3y: Option<f64>,
    pub gross_margin: Option<f64>,
    pub roe_trend: MetricTrend,
    pub score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthResult {
    pub revenue_yoy: Option<f64>,
    pub profit_yoy: Option<f64>,
    pub revenue_cagr_3y: Option<f64>,
    pub score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthResult {
    pub debt_ratio: Option<f64>,
    pub debt_trend: MetricTrend,
    pub score: u8,
}

/// Fundamental analysis of one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalReport {
    pub symbol: String,
    pub analysis_date: NaiveDate,
    pub valuation: Option<ValuationResult>,
    pub profitability: Option<ProfitabilityResult>,
    pub growth: Option<GrowthResult>,
    pub health: Option<HealthResult>,
    /// Weighted composite, 0..=100
    pub score: u8,
    pub summary: String,
}

impl FundamentalReport {
    /// Sentinel report for a symbol without statements
    pub fn no_data(symbol: impl Into<String>, analysis_date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            analysis_date,
            valuation: None,
            profitability: None,
            growth: None,
            health: None,
            score: 0,
            summary: "No financial statements available for fundamental analysis".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-15), 0);
        assert_eq!(clamp_score(55), 55);
        assert_eq!(clamp_score(135), 100);
    }

    #[test]
    fn test_trend_bonus_is_symmetric() {
        assert_eq!(TrendDirection::StrongUp.score_bonus(), 20);
        assert_eq!(TrendDirection::Sideways.score_bonus(), 0);
        assert_eq!(
            TrendDirection::WeakUpOscillating.score_bonus(),
            -TrendDirection::WeakDownOscillating.score_bonus()
        );
    }

    #[test]
    fn test_metric_trend_boundaries() {
        assert_eq!(MetricTrend::classify(11.1, 10.0), MetricTrend::Rising);
        assert_eq!(MetricTrend::classify(11.0, 10.0), MetricTrend::Stable);
        assert_eq!(MetricTrend::classify(8.9, 10.0), MetricTrend::Falling);
    }

    #[test]
    fn test_pattern_bias() {
        assert_eq!(CandlePattern::Hammer.bias(), PatternBias::Bullish);
        assert_eq!(CandlePattern::ShootingStar.bias(), PatternBias::Bearish);
        assert_eq!(CandlePattern::Doji.bias(), PatternBias::Neutral);
    }

    #[test]
    fn test_insufficient_report() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let report = TechnicalReport::insufficient("AAPL", date, 7);
        assert_eq!(report.score, 0);
        assert!(report.is_insufficient());
        assert!(report.support_resistance.is_none());
        assert!(report.summary.unwrap().contains("7 bars"));
    }

    #[test]
    fn test_report_serializes_snake_case() {
        let json = serde_json::to_string(&TrendDirection::WeakUpOscillating).unwrap();
        assert_eq!(json, "\"weak_up_oscillating\"");
    }
}
