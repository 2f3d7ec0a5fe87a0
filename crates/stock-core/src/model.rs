//! Domain values exchanged between the repository and the analysis engine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange a security is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    /// Shanghai / Shenzhen A-shares
    AShare,
    /// Hong Kong exchange
    HongKong,
    /// US exchanges
    Us,
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Market::AShare => "a_share",
            Market::HongKong => "hong_kong",
            Market::Us => "us",
        };
        f.write_str(label)
    }
}

/// Static listing information for a security
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    pub symbol: String,
    pub name: String,
    pub market: Market,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub list_date: Option<NaiveDate>,
}

/// One daily bar for one symbol
///
/// A bar is unique per `(symbol, trade_date)` and immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub symbol: String,
    pub trade_date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Previous session's close, when the data source supplies it
    #[serde(default)]
    pub prev_close: Option<f64>,
    /// Turnover amount
    #[serde(default)]
    pub amount: Option<f64>,
}

impl PriceBar {
    /// Day change in percent against `prev_close`
    ///
    /// Returns `None` when the previous close is missing or zero.
    pub fn change_pct(&self) -> Option<f64> {
        match self.prev_close {
            Some(prev) if prev != 0.0 => Some((self.close - prev) / prev * 100.0),
            _ => None,
        }
    }

    /// Check the OHLC invariants: positive prices, high on top, low at the bottom
    pub fn is_consistent(&self) -> bool {
        let positive = self.open > 0.0 && self.high > 0.0 && self.low > 0.0 && self.close > 0.0;
        positive
            && self.high >= self.open.max(self.close).max(self.low)
            && self.low <= self.open.min(self.close).min(self.high)
    }
}

/// Sort bars by trade date ascending and drop duplicate dates
///
/// Callers are not trusted to hand over an ordered series. When two bars share
/// a date the one that appeared first is kept.
pub fn sort_bars(bars: &mut Vec<PriceBar>) {
    bars.sort_by_key(|bar| bar.trade_date);
    bars.dedup_by(|later, earlier| later.trade_date == earlier.trade_date);
}

/// One periodic financial statement
///
/// Every metric is optional; providers routinely leave gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub symbol: String,
    pub report_date: NaiveDate,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub net_profit: Option<f64>,
    #[serde(default)]
    pub total_assets: Option<f64>,
    #[serde(default)]
    pub total_equity: Option<f64>,
    /// Return on equity, percent
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub pe: Option<f64>,
    #[serde(default)]
    pub pb: Option<f64>,
    /// Liabilities over assets, percent
    #[serde(default)]
    pub debt_ratio: Option<f64>,
    /// Gross margin, percent
    #[serde(default)]
    pub gross_margin: Option<f64>,
}

/// Sort statements most recent first
pub fn sort_statements(statements: &mut [FinancialStatement]) {
    statements.sort_by(|a, b| b.report_date.cmp(&a.report_date));
}

/// A symbol the user is watching, with optional price alert thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
    /// Fire a price alert when the close reaches or exceeds this level
    #[serde(default)]
    pub alert_price_high: Option<f64>,
    /// Fire a price alert when the close reaches or falls below this level
    #[serde(default)]
    pub alert_price_low: Option<f64>,
}

impl WatchlistEntry {
    /// Create an entry without thresholds
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            added_at: Utc::now(),
            note: None,
            alert_price_high: None,
            alert_price_low: None,
        }
    }

    /// Set the upper price threshold
    pub fn with_high(mut self, price: f64) -> Self {
        self.alert_price_high = Some(price);
        self
    }

    /// Set the lower price threshold
    pub fn with_low(mut self, price: f64) -> Self {
        self.alert_price_low = Some(price);
        self
    }
}

/// Kind of alert event
///
/// `VolumeSurge` and `MacdDeathCross` are part of the persisted vocabulary
/// but the engine does not emit them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    PriceBreak,
    AbnormalVolatility,
    VolumeSurge,
    MacdGoldenCross,
    MacdDeathCross,
    RsiOverbought,
    RsiOversold,
    Custom,
}

impl AlertKind {
    /// Stable wire name, as persisted
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::PriceBreak => "PRICE_BREAK",
            AlertKind::AbnormalVolatility => "ABNORMAL_VOLATILITY",
            AlertKind::VolumeSurge => "VOLUME_SURGE",
            AlertKind::MacdGoldenCross => "MACD_GOLDEN_CROSS",
            AlertKind::MacdDeathCross => "MACD_DEATH_CROSS",
            AlertKind::RsiOverbought => "RSI_OVERBOUGHT",
            AlertKind::RsiOversold => "RSI_OVERSOLD",
            AlertKind::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected alert condition
///
/// Created once per detection. Only `is_read` changes afterwards, and only
/// through the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub symbol: String,
    pub kind: AlertKind,
    pub message: String,
    pub triggered_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl AlertEvent {
    /// Create an unread event
    pub fn new(
        symbol: impl Into<String>,
        kind: AlertKind,
        message: impl Into<String>,
        triggered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            message: message.into(),
            triggered_at,
            is_read: false,
        }
    }
}
