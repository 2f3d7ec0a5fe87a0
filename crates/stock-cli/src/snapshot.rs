//! JSON snapshot repository
//!
//! Loads every record from one JSON document and serves reads from memory.
//! Lookback windows are measured back from the newest bar (or statement) of
//! the requested symbol, so an old snapshot still produces full reports.

use async_trait::async_trait;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stock_core::{
    AlertEvent, Error, FinancialStatement, PriceBar, Repository, Result, StockInfo, WatchlistEntry,
};
use tokio::sync::RwLock;
use tracing::debug;

/// On-disk layout of a snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub stocks: Vec<StockInfo>,
    #[serde(default)]
    pub bars: Vec<PriceBar>,
    #[serde(default)]
    pub statements: Vec<FinancialStatement>,
    #[serde(default)]
    pub watchlist: Vec<WatchlistEntry>,
}

/// In-memory repository over a [`Snapshot`]
///
/// Persisted alerts are kept in memory for the life of the process.
pub struct SnapshotRepository {
    snapshot: Snapshot,
    alerts: RwLock<Vec<AlertEvent>>,
}

impl SnapshotRepository {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            alerts: RwLock::new(Vec::new()),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| Error::Repository(format!("cannot read {}: {err}", path.display())))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;

        debug!(
            path = %path.display(),
            stocks = snapshot.stocks.len(),
            bars = snapshot.bars.len(),
            statements = snapshot.statements.len(),
            "Snapshot loaded"
        );
        Ok(Self::new(snapshot))
    }

    /// Alerts persisted so far
    pub async fn alerts(&self) -> Vec<AlertEvent> {
        self.alerts.read().await.clone()
    }
}

#[async_trait]
impl Repository for SnapshotRepository {
    async fn fetch_price_bars(&self, symbol: &str, lookback_days: u32) -> Result<Vec<PriceBar>> {
        let bars = self.snapshot.bars.iter().filter(|bar| bar.symbol == symbol);
        let Some(latest) = bars.clone().map(|bar| bar.trade_date).max() else {
            return Ok(Vec::new());
        };
        let since = latest - Duration::days(i64::from(lookback_days));

        Ok(bars.filter(|bar| bar.trade_date > since).cloned().collect())
    }

    async fn fetch_statements(&self, symbol: &str, years: u32) -> Result<Vec<FinancialStatement>> {
        let statements = self.snapshot.statements.iter().filter(|s| s.symbol == symbol);
        let Some(latest) = statements.clone().map(|s| s.report_date).max() else {
            return Ok(Vec::new());
        };
        let since = latest - Duration::days(i64::from(years) * 365);

        Ok(statements.filter(|s| s.report_date > since).cloned().collect())
    }

    async fn fetch_stock_info(&self, symbol: &str) -> Result<Option<StockInfo>> {
        Ok(self.snapshot.stocks.iter().find(|info| info.symbol == symbol).cloned())
    }

    async fn fetch_watchlist(&self) -> Result<Vec<WatchlistEntry>> {
        Ok(self.snapshot.watchlist.clone())
    }

    async fn persist_alert(&self, alert: &AlertEvent) -> Result<()> {
        self.alerts.write().await.push(alert.clone());
        Ok(())
    }
}
