//! TTL read cache in front of a repository

use crate::config::AnalysisConfig;
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use stock_core::{AlertEvent, FinancialStatement, PriceBar, Repository, StockInfo, WatchlistEntry};
use tokio::sync::RwLock;

/// Cache key for a ranged read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    /// Lookback days or statement years
    pub span: u32,
}

impl CacheKey {
    pub fn new(symbol: impl Into<String>, span: u32) -> Self {
        Self {
            symbol: symbol.into(),
            span,
        }
    }
}

/// Thread-safe TTL cache
pub struct TtlCache<K, V> {
    cache: Arc<RwLock<TimedCache<K, V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &K) -> Option<V> {
        // Expiry check mutates, so even a lookup takes the write lock
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: K, value: V) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// Errors are returned as-is and never cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);
        let value = fetcher().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

/// Repository decorator caching price bars and statements
///
/// Stock info, the watch-list and alert writes always go to the inner
/// repository, so threshold edits are seen on the next scan.
pub struct CachedRepository<R> {
    inner: R,
    prices: TtlCache<CacheKey, Vec<PriceBar>>,
    statements: TtlCache<CacheKey, Vec<FinancialStatement>>,
}

impl<R: Repository> CachedRepository<R> {
    pub fn new(inner: R, price_ttl: Duration, statement_ttl: Duration) -> Self {
        Self {
            inner,
            prices: TtlCache::new(price_ttl),
            statements: TtlCache::new(statement_ttl),
        }
    }

    /// Use the TTLs from `config`
    pub fn from_config(inner: R, config: &AnalysisConfig) -> Self {
        Self::new(inner, config.cache_ttl_prices, config.cache_ttl_statements)
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drop every cached read
    pub async fn invalidate(&self) {
        self.prices.clear().await;
        self.statements.clear().await;
    }
}

#[async_trait]
impl<R: Repository> Repository for CachedRepository<R> {
    async fn fetch_price_bars(&self, symbol: &str, lookback_days: u32) -> stock_core::Result<Vec<PriceBar>> {
        self.prices
            .get_or_fetch(CacheKey::new(symbol, lookback_days), || {
                self.inner.fetch_price_bars(symbol, lookback_days)
            })
            .await
    }

    async fn fetch_statements(&self, symbol: &str, years: u32) -> stock_core::Result<Vec<FinancialStatement>> {
        self.statements
            .get_or_fetch(CacheKey::new(symbol, years), || {
                self.inner.fetch_statements(symbol, years)
            })
            .await
    }

    async fn fetch_stock_info(&self, symbol: &str) -> stock_core::Result<Option<StockInfo>> {
        self.inner.fetch_stock_info(symbol).await
    }

    async fn fetch_watchlist(&self) -> stock_core::Result<Vec<WatchlistEntry>> {
        self.inner.fetch_watchlist().await
    }

    async fn persist_alert(&self, alert: &AlertEvent) -> stock_core::Result<()> {
        self.inner.persist_alert(alert).await
    }
}
