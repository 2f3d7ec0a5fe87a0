//! Columnar view over an ordered bar sequence

use stock_core::{PriceBar, sort_bars};
use tracing::warn;

/// OHLC columns of one symbol's bars, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
}

impl PriceSeries {
    /// Build from bars already in ascending date order
    pub fn from_sorted(bars: &[PriceBar]) -> Self {
        let mut series = Self {
            opens: Vec::with_capacity(bars.len()),
            highs: Vec::with_capacity(bars.len()),
            lows: Vec::with_capacity(bars.len()),
            closes: Vec::with_capacity(bars.len()),
        };
        for bar in bars {
            series.opens.push(bar.open);
            series.highs.push(bar.high);
            series.lows.push(bar.low);
            series.closes.push(bar.close);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    /// The same series one bar earlier
    pub fn without_last(&self) -> Self {
        let keep = self.len().saturating_sub(1);
        Self {
            opens: self.opens[..keep].to_vec(),
            highs: self.highs[..keep].to_vec(),
            lows: self.lows[..keep].to_vec(),
            closes: self.closes[..keep].to_vec(),
        }
    }
}

/// Copy, sort ascending and dedup a caller-supplied bar list
///
/// Bars that break the OHLC invariants are dropped before sorting.
pub fn ordered_bars(bars: &[PriceBar]) -> Vec<PriceBar> {
    let mut kept: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        if bar.is_consistent() {
            kept.push(bar.clone());
        } else {
            warn!(symbol = %bar.symbol, date = %bar.trade_date, "Dropping bar with inconsistent OHLC");
        }
    }
    sort_bars(&mut kept);
    kept
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Days, NaiveDate};
    use stock_core::PriceBar;

    /// Bars with open == close and a ±1 range, one per calendar day from 2024-01-01
    pub fn bars_from_closes(symbol: &str, closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                symbol: symbol.to_string(),
                trade_date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10_000,
                prev_close: None,
                amount: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::bars_from_closes;
    use super::*;

    #[test]
    fn test_from_sorted_columns() {
        let bars = bars_from_closes("AAPL", &[10.0, 11.0, 12.0]);
        let series = PriceSeries::from_sorted(&bars);
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes, vec![10.0, 11.0, 12.0]);
        assert_eq!(series.highs, vec![11.0, 12.0, 13.0]);
        assert_eq!(series.last_close(), Some(12.0));
    }

    #[test]
    fn test_without_last() {
        let bars = bars_from_closes("AAPL", &[10.0, 11.0, 12.0]);
        let prev = PriceSeries::from_sorted(&bars).without_last();
        assert_eq!(prev.closes, vec![10.0, 11.0]);
        assert_eq!(prev.lows, vec![9.0, 10.0]);
        assert!(PriceSeries::default().without_last().is_empty());
    }

    #[test]
    fn test_ordered_bars_sorts_reversed_input() {
        let mut bars = bars_from_closes("AAPL", &[10.0, 11.0, 12.0]);
        bars.reverse();
        let ordered = ordered_bars(&bars);
        let closes: Vec<f64> = ordered.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_ordered_bars_drops_inconsistent_ohlc() {
        let mut bars = bars_from_closes("AAPL", &[10.0, 11.0, 12.0, 13.0]);
        // High below low
        bars[1].high = 9.0;
        // Non-positive price
        bars[2].low = 0.0;
        let ordered = ordered_bars(&bars);
        let closes: Vec<f64> = ordered.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![10.0, 13.0]);
    }
}
