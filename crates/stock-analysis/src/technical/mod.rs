//! Technical analyzer
//!
//! Turns one symbol's daily bars into a [`TechnicalReport`]: trend class,
//! indicator snapshot, support/resistance, candlestick patterns and a
//! composite score.

pub mod levels;
pub mod patterns;
pub mod scoring;
pub mod trend;

use crate::report::{IndicatorSnapshot, TechnicalReport};
use crate::series::{PriceSeries, ordered_bars};
use chrono::NaiveDate;
use stock_core::PriceBar;
use stock_indicators::{
    BollingerParams, KdjParams, MacdParams, atr, bollinger, kdj, macd, moving_averages, rsi,
};
use tracing::{info, warn};

/// Fewest bars a full technical report is produced for
pub const MIN_BARS: usize = 20;

const MA_PERIODS: [usize; 4] = [5, 10, 20, 60];
const RSI_PERIOD: usize = 14;
const ATR_PERIOD: usize = 14;

/// Stateless technical analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalAnalyzer;

impl TechnicalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze `bars` as of `analysis_date`
    ///
    /// Bars may arrive in any order; they are sorted and deduplicated by date
    /// first. Fewer than [`MIN_BARS`] bars yield the insufficient-data report.
    pub fn analyze(&self, symbol: &str, bars: &[PriceBar], analysis_date: NaiveDate) -> TechnicalReport {
        let bars = ordered_bars(bars);
        if bars.len() < MIN_BARS {
            warn!(symbol, bars = bars.len(), "Insufficient data for technical analysis");
            return TechnicalReport::insufficient(symbol, analysis_date, bars.len());
        }

        let series = PriceSeries::from_sorted(&bars);
        let trend = trend::classify_trend(&series.closes);
        let indicators = snapshot(&series);
        let support_resistance = levels::support_resistance(&series.highs, &series.lows, &series.closes);
        let patterns = patterns::detect_patterns(&series);
        let score = scoring::composite_score(trend.as_ref(), &indicators, &patterns);

        info!(symbol, score, "Technical analysis completed");

        TechnicalReport {
            symbol: symbol.to_string(),
            analysis_date,
            trend,
            indicators: Some(indicators),
            support_resistance,
            patterns,
            score,
            summary: None,
        }
    }
}

/// Every indicator whose minimum history is met
pub fn snapshot(series: &PriceSeries) -> IndicatorSnapshot {
    let closes = &series.closes;
    let mas = moving_averages(closes, &MA_PERIODS);

    IndicatorSnapshot {
        ma5: mas.get(&5).copied(),
        ma10: mas.get(&10).copied(),
        ma20: mas.get(&20).copied(),
        ma60: mas.get(&60).copied(),
        macd: macd(closes, MacdParams::default()).ok(),
        kdj: kdj(&series.highs, &series.lows, closes, KdjParams::default()).ok(),
        rsi: rsi(closes, RSI_PERIOD).ok(),
        bollinger: bollinger(closes, BollingerParams::default()).ok(),
        atr: atr(&series.highs, &series.lows, closes, ATR_PERIOD).ok(),
    }
}
