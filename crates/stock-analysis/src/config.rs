//! Configuration for analysis operations

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding [`AnalysisConfig::price_lookback_days`]
pub const ENV_PRICE_LOOKBACK_DAYS: &str = "STOCK_PRICE_LOOKBACK_DAYS";
/// Environment variable overriding [`AnalysisConfig::alert_lookback_days`]
pub const ENV_ALERT_LOOKBACK_DAYS: &str = "STOCK_ALERT_LOOKBACK_DAYS";
/// Environment variable overriding [`AnalysisConfig::statement_years`]
pub const ENV_STATEMENT_YEARS: &str = "STOCK_STATEMENT_YEARS";

/// Configuration for analysis operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Calendar days of bars fetched for a technical report
    pub price_lookback_days: u32,

    /// Years of statements fetched for a fundamental report
    pub statement_years: u32,

    /// Calendar days of bars fetched per watch-list entry during an alert scan
    pub alert_lookback_days: u32,

    /// Years of statements used by the growth screening strategy
    pub growth_statement_years: u32,

    /// Calendar days of bars used by the momentum screening strategy
    pub momentum_lookback_days: u32,

    /// Absolute day change, in percent, that counts as abnormal volatility
    pub volatility_threshold_pct: f64,

    /// RSI level above which an overbought alert fires
    pub rsi_overbought: f64,

    /// RSI level below which an oversold alert fires
    pub rsi_oversold: f64,

    /// Cache TTL for price bars
    pub cache_ttl_prices: Duration,

    /// Cache TTL for financial statements
    pub cache_ttl_statements: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            price_lookback_days: 365,
            statement_years: 5,
            alert_lookback_days: 90,
            growth_statement_years: 3,
            momentum_lookback_days: 120,
            volatility_threshold_pct: 5.0,
            rsi_overbought: 80.0,
            rsi_oversold: 20.0,
            cache_ttl_prices: Duration::from_secs(60),        // 1 minute
            cache_ttl_statements: Duration::from_secs(3600),  // 1 hour
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(days) = parse_u32(&lookup, ENV_PRICE_LOOKBACK_DAYS)? {
            self.price_lookback_days = days;
        }
        if let Some(days) = parse_u32(&lookup, ENV_ALERT_LOOKBACK_DAYS)? {
            self.alert_lookback_days = days;
        }
        if let Some(years) = parse_u32(&lookup, ENV_STATEMENT_YEARS)? {
            self.statement_years = years;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("price_lookback_days", self.price_lookback_days),
            ("statement_years", self.statement_years),
            ("alert_lookback_days", self.alert_lookback_days),
            ("growth_statement_years", self.growth_statement_years),
            ("momentum_lookback_days", self.momentum_lookback_days),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, value)| *value == 0) {
            return Err(StockError::ConfigError(format!(
                "{name} must be greater than 0"
            )));
        }

        if self.volatility_threshold_pct <= 0.0 {
            return Err(StockError::ConfigError(
                "volatility_threshold_pct must be positive".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(StockError::ConfigError(format!(
                "RSI thresholds must satisfy 0 <= oversold ({}) < overbought ({}) <= 100",
                self.rsi_oversold, self.rsi_overbought
            )));
        }

        Ok(())
    }
}

fn parse_u32<F>(lookup: &F, key: &str) -> Result<Option<u32>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|e| StockError::ConfigError(format!("{key}={raw}: {e}")))
        })
        .transpose()
}

/// Builder for AnalysisConfig
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    price_lookback_days: Option<u32>,
    statement_years: Option<u32>,
    alert_lookback_days: Option<u32>,
    growth_statement_years: Option<u32>,
    momentum_lookback_days: Option<u32>,
    volatility_threshold_pct: Option<f64>,
    rsi_overbought: Option<f64>,
    rsi_oversold: Option<f64>,
    cache_ttl_prices: Option<Duration>,
    cache_ttl_statements: Option<Duration>,
}

impl AnalysisConfigBuilder {
    /// Set the technical report lookback
    pub fn price_lookback_days(mut self, days: u32) -> Self {
        self.price_lookback_days = Some(days);
        self
    }

    /// Set the fundamental report statement window
    pub fn statement_years(mut self, years: u32) -> Self {
        self.statement_years = Some(years);
        self
    }

    /// Set the alert scan lookback
    pub fn alert_lookback_days(mut self, days: u32) -> Self {
        self.alert_lookback_days = Some(days);
        self
    }

    /// Set the growth strategy statement window
    pub fn growth_statement_years(mut self, years: u32) -> Self {
        self.growth_statement_years = Some(years);
        self
    }

    /// Set the momentum strategy lookback
    pub fn momentum_lookback_days(mut self, days: u32) -> Self {
        self.momentum_lookback_days = Some(days);
        self
    }

    /// Set the abnormal volatility threshold
    pub fn volatility_threshold_pct(mut self, pct: f64) -> Self {
        self.volatility_threshold_pct = Some(pct);
        self
    }

    /// Set the RSI alert band
    pub fn rsi_alert_band(mut self, oversold: f64, overbought: f64) -> Self {
        self.rsi_oversold = Some(oversold);
        self.rsi_overbought = Some(overbought);
        self
    }

    /// Set cache TTL for price bars
    pub fn cache_ttl_prices(mut self, duration: Duration) -> Self {
        self.cache_ttl_prices = Some(duration);
        self
    }

    /// Set cache TTL for financial statements
    pub fn cache_ttl_statements(mut self, duration: Duration) -> Self {
        self.cache_ttl_statements = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalysisConfig> {
        let defaults = AnalysisConfig::default();

        let config = AnalysisConfig {
            price_lookback_days: self.price_lookback_days.unwrap_or(defaults.price_lookback_days),
            statement_years: self.statement_years.unwrap_or(defaults.statement_years),
            alert_lookback_days: self.alert_lookback_days.unwrap_or(defaults.alert_lookback_days),
            growth_statement_years: self
                .growth_statement_years
                .unwrap_or(defaults.growth_statement_years),
            momentum_lookback_days: self
                .momentum_lookback_days
                .unwrap_or(defaults.momentum_lookback_days),
            volatility_threshold_pct: self
                .volatility_threshold_pct
                .unwrap_or(defaults.volatility_threshold_pct),
            rsi_overbought: self.rsi_overbought.unwrap_or(defaults.rsi_overbought),
            rsi_oversold: self.rsi_oversold.unwrap_or(defaults.rsi_oversold),
            cache_ttl_prices: self.cache_ttl_prices.unwrap_or(defaults.cache_ttl_prices),
            cache_ttl_statements: self.cache_ttl_statements.unwrap_or(defaults.cache_ttl_statements),
        };

        config.validate()?;
        Ok(config)
    }
}
