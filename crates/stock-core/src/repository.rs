//! Persistence collaborator contract

use crate::model::{AlertEvent, FinancialStatement, PriceBar, StockInfo, WatchlistEntry};
use crate::Result;
use async_trait::async_trait;

/// Read/write access to stored market data
///
/// The analysis engine never owns storage. Everything it needs arrives through
/// this trait, and each call should reflect one consistent point in time.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Daily bars for `symbol` covering the last `lookback_days` calendar days
    ///
    /// Implementations should return bars in ascending date order, but the
    /// engine sorts again before use.
    async fn fetch_price_bars(&self, symbol: &str, lookback_days: u32) -> Result<Vec<PriceBar>>;

    /// Financial statements for `symbol` covering the last `years` years, any order
    async fn fetch_statements(&self, symbol: &str, years: u32) -> Result<Vec<FinancialStatement>>;

    /// Listing information, `None` when the symbol is unknown
    async fn fetch_stock_info(&self, symbol: &str) -> Result<Option<StockInfo>>;

    /// All watch-list entries
    async fn fetch_watchlist(&self) -> Result<Vec<WatchlistEntry>>;

    /// Store an alert event
    ///
    /// At-least-once delivery is acceptable; consumers dedupe on
    /// `(symbol, kind, triggered_at)`.
    async fn persist_alert(&self, alert: &AlertEvent) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AlertKind;
    use chrono::Utc;
    use mockall::mock;

    mock! {
        pub Repo {}

        #[async_trait]
        impl Repository for Repo {
            async fn fetch_price_bars(&self, symbol: &str, lookback_days: u32) -> Result<Vec<PriceBar>>;
            async fn fetch_statements(&self, symbol: &str, years: u32) -> Result<Vec<FinancialStatement>>;
            async fn fetch_stock_info(&self, symbol: &str) -> Result<Option<StockInfo>>;
            async fn fetch_watchlist(&self) -> Result<Vec<WatchlistEntry>>;
            async fn persist_alert(&self, alert: &AlertEvent) -> Result<()>;
        }
    }

    #[tokio::test]
    async fn test_repository_is_object_safe() {
        let mut repo = MockRepo::new();
        repo.expect_persist_alert().times(1).returning(|_| Ok(()));
        repo.expect_fetch_watchlist()
            .returning(|| Ok(vec![WatchlistEntry::new("AAPL")]));

        let repo: Box<dyn Repository> = Box::new(repo);
        let watchlist = repo.fetch_watchlist().await.unwrap();
        assert_eq!(watchlist.len(), 1);

        let alert = AlertEvent::new("AAPL", AlertKind::Custom, "note", Utc::now());
        assert!(repo.persist_alert(&alert).await.is_ok());
    }
}
