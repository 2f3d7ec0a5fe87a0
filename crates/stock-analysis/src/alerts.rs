//! Alert engine
//!
//! Level-triggered conditions (price breach, abnormal volatility, RSI extremes)
//! fire on every scan while they hold. The MACD golden cross is edge-triggered:
//! it fires only when the predicate holds on the full series and did not hold
//! one bar earlier.

use crate::batch::BatchReport;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::series::{PriceSeries, ordered_bars};
use chrono::{DateTime, Utc};
use stock_core::{AlertEvent, AlertKind, PriceBar, Repository, WatchlistEntry};
use stock_indicators::{MacdParams, macd, rsi};
use tracing::{debug, info, warn};

const RSI_PERIOD: usize = 14;
/// Bars an entry needs before any condition is checked
const MIN_BARS: usize = 2;

/// Detects alert conditions for watch-list entries
#[derive(Debug, Clone)]
pub struct AlertEngine {
    volatility_threshold_pct: f64,
    rsi_overbought: f64,
    rsi_oversold: f64,
    lookback_days: u32,
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl AlertEngine {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            volatility_threshold_pct: config.volatility_threshold_pct,
            rsi_overbought: config.rsi_overbought,
            rsi_oversold: config.rsi_oversold,
            lookback_days: config.alert_lookback_days,
        }
    }

    /// Every alert condition that holds for `entry` at the last bar
    ///
    /// Pure: performs no I/O and stamps every event with `now`.
    pub fn evaluate(&self, entry: &WatchlistEntry, bars: &[PriceBar], now: DateTime<Utc>) -> Vec<AlertEvent> {
        let bars = ordered_bars(bars);
        let symbol = entry.symbol.as_str();
        if bars.len() < MIN_BARS {
            debug!(symbol, bars = bars.len(), "Not enough bars, skipping alert check");
            return Vec::new();
        }

        let series = PriceSeries::from_sorted(&bars);
        let mut events = Vec::new();
        events.extend(self.price_breaks(entry, &series, now));
        events.extend(self.volatility(symbol, &bars, now));
        events.extend(self.macd_golden_cross(symbol, &series, now));
        events.extend(self.rsi_extremes(symbol, &series, now));

        for event in &events {
            info!(symbol, kind = %event.kind, message = %event.message, "Alert triggered");
        }
        events
    }

    /// Evaluate the whole watch-list and persist every event
    ///
    /// A failure to fetch one entry's bars, or to persist one event, is recorded
    /// against that symbol and the scan continues. Only a failure to read the
    /// watch-list itself aborts.
    pub async fn scan<R>(&self, repo: &R) -> Result<BatchReport<AlertEvent>>
    where
        R: Repository + ?Sized,
    {
        let watchlist = repo.fetch_watchlist().await?;
        let mut report = BatchReport::new();
        if watchlist.is_empty() {
            debug!("No watch-list entries to check");
            return Ok(report);
        }

        let now = Utc::now();
        for entry in &watchlist {
            let bars = match repo.fetch_price_bars(&entry.symbol, self.lookback_days).await {
                Ok(bars) => bars,
                Err(err) => {
                    warn!(symbol = %entry.symbol, error = %err, "Failed to load bars for alert check");
                    report.fail(&entry.symbol, err);
                    continue;
                }
            };

            for event in self.evaluate(entry, &bars, now) {
                match repo.persist_alert(&event).await {
                    Ok(()) => report.push(event),
                    Err(err) => {
                        warn!(symbol = %entry.symbol, kind = %event.kind, error = %err, "Failed to persist alert");
                        report.fail(&entry.symbol, err);
                    }
                }
            }
        }

        info!(
            entries = watchlist.len(),
            alerts = report.succeeded.len(),
            failures = report.failures.len(),
            "Alert scan completed"
        );
        Ok(report)
    }

    fn price_breaks(&self, entry: &WatchlistEntry, series: &PriceSeries, now: DateTime<Utc>) -> Vec<AlertEvent> {
        let Some(close) = series.last_close() else {
            return Vec::new();
        };
        let mut events = Vec::new();

        if let Some(high) = entry.alert_price_high.filter(|high| close >= *high) {
            events.push(AlertEvent::new(
                &entry.symbol,
                AlertKind::PriceBreak,
                format!("Price broke above upper limit: close {close:.2} >= {high:.2}"),
                now,
            ));
        }
        if let Some(low) = entry.alert_price_low.filter(|low| close <= *low) {
            events.push(AlertEvent::new(
                &entry.symbol,
                AlertKind::PriceBreak,
                format!("Price broke below lower limit: close {close:.2} <= {low:.2}"),
                now,
            ));
        }
        events
    }

    fn volatility(&self, symbol: &str, bars: &[PriceBar], now: DateTime<Utc>) -> Option<AlertEvent> {
        let change = day_change_pct(bars)?;
        if change.abs() < self.volatility_threshold_pct {
            return None;
        }
        let direction = if change > 0.0 { "up" } else { "down" };
        Some(AlertEvent::new(
            symbol,
            AlertKind::AbnormalVolatility,
            format!("Abnormal volatility: {direction} {:.2}%", change.abs()),
            now,
        ))
    }

    fn macd_golden_cross(&self, symbol: &str, series: &PriceSeries, now: DateTime<Utc>) -> Option<AlertEvent> {
        let params = MacdParams::default();
        // Both the current and the previous series need a full slow window
        let current = macd(&series.closes, params).ok()?;
        let previous = macd(&series.without_last().closes, params).ok()?;

        (current.is_golden_cross() && !previous.is_golden_cross()).then(|| {
            AlertEvent::new(
                symbol,
                AlertKind::MacdGoldenCross,
                format!(
                    "MACD golden cross: DIF({:.4}) > DEA({:.4})",
                    current.dif, current.dea
                ),
                now,
            )
        })
    }

    fn rsi_extremes(&self, symbol: &str, series: &PriceSeries, now: DateTime<Utc>) -> Option<AlertEvent> {
        let value = rsi(&series.closes, RSI_PERIOD).ok()?;
        if value > self.rsi_overbought {
            Some(AlertEvent::new(
                symbol,
                AlertKind::RsiOverbought,
                format!("RSI overbought: RSI({value:.2}) > {}", self.rsi_overbought),
                now,
            ))
        } else if value < self.rsi_oversold {
            Some(AlertEvent::new(
                symbol,
                AlertKind::RsiOversold,
                format!("RSI oversold: RSI({value:.2}) < {}", self.rsi_oversold),
                now,
            ))
        } else {
            None
        }
    }
}

/// Day change of the last bar in percent
///
/// Uses the bar's own previous close when present, otherwise the prior bar's close.
fn day_change_pct(bars: &[PriceBar]) -> Option<f64> {
    let last = bars.last()?;
    if let Some(change) = last.change_pct() {
        return Some(change);
    }
    let prior = bars.len().checked_sub(2).map(|i| bars[i].close)?;
    (prior != 0.0).then(|| (last.close - prior) / prior * 100.0)
}
