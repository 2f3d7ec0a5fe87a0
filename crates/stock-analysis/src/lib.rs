//! Stock analysis engine
//!
//! This crate turns stored market data into decisions:
//!
//! - Technical analysis: trend class, indicator snapshot, support/resistance,
//!   candlestick patterns and a 0-100 score
//! - Fundamental analysis: valuation, profitability, growth and health scores
//!   combined into a weighted 0-100 score with a short narrative
//! - Alert detection over a watch-list, with edge-triggered MACD crosses and
//!   level-triggered price, volatility and RSI conditions
//! - Strategy-driven stock screening
//!
//! Every computation is a pure function of its inputs plus the analysis date.
//! Storage sits behind [`stock_core::Repository`]; [`AnalysisService`] wires a
//! repository to the analyzers.
//!
//! # Example
//!
//! ```rust,ignore
//! use stock_analysis::{AnalysisConfig, AnalysisService, CachedRepository};
//! use std::sync::Arc;
//!
//! let repo = CachedRepository::from_config(my_repo, &AnalysisConfig::default());
//! let service = AnalysisService::new(Arc::new(repo), AnalysisConfig::default());
//!
//! let report = service.technical("600519.SH").await?;
//! println!("{} scored {}", report.symbol, report.score);
//! ```

pub mod alerts;
pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod fundamental;
pub mod prompts;
pub mod report;
pub mod screening;
pub mod series;
pub mod service;
pub mod summary;
pub mod technical;

pub use alerts::AlertEngine;
pub use batch::{BatchReport, SymbolFailure};
pub use cache::{CachedRepository, TtlCache};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::{Result, StockError};
pub use fundamental::FundamentalAnalyzer;
pub use report::{
    CandlePattern, Direction, FundamentalReport, GrowthResult, HealthResult, IndicatorSnapshot,
    MetricTrend, PatternBias, ProfitabilityResult, SupportResistance, TechnicalReport,
    TrendDirection, TrendResult, ValuationResult,
};
pub use screening::{
    ScreenResult, Screener, Strategy, StrategyCategory, StrategyKind, StrategyParams,
    StrategyRegistry,
};
pub use service::AnalysisService;
pub use summary::{AiAnalysis, Summarizer};
pub use technical::TechnicalAnalyzer;
