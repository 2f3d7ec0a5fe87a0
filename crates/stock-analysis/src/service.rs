//! Repository-backed entry points for the analyzers

use crate::alerts::AlertEngine;
use crate::batch::BatchReport;
use crate::config::AnalysisConfig;
use crate::error::{Result, StockError};
use crate::fundamental::FundamentalAnalyzer;
use crate::prompts;
use crate::report::{FundamentalReport, TechnicalReport};
use crate::screening::{ScreenResult, Screener, StrategyParams, StrategyRegistry};
use crate::summary::{AiAnalysis, Summarizer};
use crate::technical::TechnicalAnalyzer;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use stock_core::{AlertEvent, Market, Repository, StockInfo};
use tracing::{error, info};

/// Wires a repository to the analyzers, the screener and the alert engine
///
/// Lookback windows come from [`AnalysisConfig`]. Reports are dated with the
/// current UTC day; the `*_as_of` variants take the date explicitly.
pub struct AnalysisService<R: Repository + ?Sized> {
    repo: Arc<R>,
    config: AnalysisConfig,
    technical: TechnicalAnalyzer,
    fundamental: FundamentalAnalyzer,
    screener: Screener,
    alerts: AlertEngine,
}

impl<R: Repository + ?Sized> AnalysisService<R> {
    /// Create a service with the built-in strategy registry
    pub fn new(repo: Arc<R>, config: AnalysisConfig) -> Self {
        Self::with_registry(repo, config, Arc::new(StrategyRegistry::builtin()))
    }

    pub fn with_registry(repo: Arc<R>, config: AnalysisConfig, registry: Arc<StrategyRegistry>) -> Self {
        Self {
            repo,
            technical: TechnicalAnalyzer::new(),
            fundamental: FundamentalAnalyzer::new(),
            screener: Screener::new(registry, config.clone()),
            alerts: AlertEngine::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    pub fn screener(&self) -> &Screener {
        &self.screener
    }

    pub fn alert_engine(&self) -> &AlertEngine {
        &self.alerts
    }

    pub async fn technical(&self, symbol: &str) -> Result<TechnicalReport> {
        self.technical_as_of(symbol, today()).await
    }

    pub async fn technical_as_of(&self, symbol: &str, as_of: NaiveDate) -> Result<TechnicalReport> {
        let bars = self
            .repo
            .fetch_price_bars(symbol, self.config.price_lookback_days)
            .await?;
        Ok(self.technical.analyze(symbol, &bars, as_of))
    }

    pub async fn fundamental(&self, symbol: &str) -> Result<FundamentalReport> {
        self.fundamental_as_of(symbol, today()).await
    }

    pub async fn fundamental_as_of(&self, symbol: &str, as_of: NaiveDate) -> Result<FundamentalReport> {
        let statements = self
            .repo
            .fetch_statements(symbol, self.config.statement_years)
            .await?;
        Ok(self.fundamental.analyze(symbol, &statements, as_of))
    }

    /// Listing information, `NotFound` when the symbol is unknown
    pub async fn stock_info(&self, symbol: &str) -> Result<StockInfo> {
        self.repo
            .fetch_stock_info(symbol)
            .await?
            .ok_or_else(|| StockError::Repository(stock_core::Error::NotFound(symbol.to_string())))
    }

    /// Ask `summarizer` for commentary on both reports
    ///
    /// Repository and template failures are errors. A summarizer failure is
    /// not: it yields an [`AiAnalysis`] with confidence 0.
    pub async fn ai_analysis(&self, symbol: &str, summarizer: &dyn Summarizer) -> Result<AiAnalysis> {
        let (technical, fundamental) =
            futures::try_join!(self.technical(symbol), self.fundamental(symbol))?;

        let prompt = prompts::stock_analysis(
            symbol,
            &prompts::fundamental_facts(&fundamental),
            &prompts::technical_facts(&technical),
        )?;

        match summarizer.summarize(prompts::SYSTEM_ANALYST, &prompt).await {
            Ok(summary) => {
                info!(symbol, "AI analysis generated");
                Ok(AiAnalysis::generated(symbol, summary, Utc::now()))
            }
            Err(err) => {
                error!(symbol, error = %err, "AI analysis failed");
                Ok(AiAnalysis::failed(symbol, err, Utc::now()))
            }
        }
    }

    pub async fn screen(
        &self,
        strategy_id: &str,
        overrides: &StrategyParams,
        market: Market,
    ) -> Result<BatchReport<ScreenResult>> {
        self.screener
            .screen(self.repo.as_ref(), strategy_id, overrides, market, today())
            .await
    }

    /// Run one alert scan over the watch-list
    pub async fn scan_alerts(&self) -> Result<BatchReport<AlertEvent>> {
        self.alerts.scan(self.repo.as_ref()).await
    }
}

impl<R: Repository + ?Sized> Clone for AnalysisService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            config: self.config.clone(),
            technical: self.technical,
            fundamental: self.fundamental,
            screener: self.screener.clone(),
            alerts: self.alerts.clone(),
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fixtures::bars_from_closes;
    use async_trait::async_trait;
    use mockall::mock;
    use stock_core::{FinancialStatement, PriceBar, WatchlistEntry};

    mock! {
        pub Repo {}

        #[async_trait]
        impl Repository for Repo {
            async fn fetch_price_bars(&self, symbol: &str, lookback_days: u32) -> stock_core::Result<Vec<PriceBar>>;
            async fn fetch_statements(&self, symbol: &str, years: u32) -> stock_core::Result<Vec<FinancialStatement>>;
            async fn fetch_stock_info(&self, symbol: &str) -> stock_core::Result<Option<StockInfo>>;
            async fn fetch_watchlist(&self) -> stock_core::Result<Vec<WatchlistEntry>>;
            async fn persist_alert(&self, alert: &AlertEvent) -> stock_core::Result<()>;
        }
    }

    mock! {
        pub Llm {}

        #[async_trait]
        impl Summarizer for Llm {
            async fn summarize(&self, system: &str, prompt: &str) -> Result<String>;
        }
    }

    fn rising_closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[tokio::test]
    async fn test_technical_uses_configured_lookback() {
        let mut repo = MockRepo::new();
        repo.expect_fetch_price_bars().times(1).returning(|symbol, days| {
            assert_eq!(days, 200);
            Ok(bars_from_closes(symbol, &rising_closes(30)))
        });

        let config = AnalysisConfig::builder().price_lookback_days(200).build().unwrap();
        let service = AnalysisService::new(Arc::new(repo), config);
        let report = service.technical_as_of("AAPL", date()).await.unwrap();

        assert_eq!(report.symbol, "AAPL");
        assert_eq!(report.analysis_date, date());
        assert!(!report.is_insufficient());
    }

    #[tokio::test]
    async fn test_technical_propagates_repository_error() {
        let mut repo = MockRepo::new();
        repo.expect_fetch_price_bars()
            .returning(|_, _| Err(stock_core::Error::Unavailable("db down".to_string())));

        let service = AnalysisService::new(Arc::new(repo), AnalysisConfig::default());
        let err = service.technical("AAPL").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_fundamental_without_statements() {
        let mut repo = MockRepo::new();
        repo.expect_fetch_statements().returning(|_, years| {
            assert_eq!(years, 5);
            Ok(Vec::new())
        });

        let service = AnalysisService::new(Arc::new(repo), AnalysisConfig::default());
        let report = service.fundamental_as_of("AAPL", date()).await.unwrap();
        assert_eq!(report.score, 0);
        assert!(report.valuation.is_none());
    }

    #[tokio::test]
    async fn test_stock_info_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_fetch_stock_info().returning(|_| Ok(None));

        let service = AnalysisService::new(Arc::new(repo), AnalysisConfig::default());
        let err = service.stock_info("ZZZZ").await.unwrap_err();
        assert!(matches!(
            err,
            StockError::Repository(stock_core::Error::NotFound(ref symbol)) if symbol == "ZZZZ"
        ));
    }

    fn repo_with_history() -> MockRepo {
        let mut repo = MockRepo::new();
        repo.expect_fetch_price_bars()
            .returning(|symbol, _| Ok(bars_from_closes(symbol, &rising_closes(30))));
        repo.expect_fetch_statements().returning(|symbol, _| {
            Ok(vec![FinancialStatement {
                symbol: symbol.to_string(),
                report_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                pe: Some(12.0),
                roe: Some(18.0),
                ..Default::default()
            }])
        });
        repo
    }

    #[tokio::test]
    async fn test_ai_analysis_success() {
        let mut llm = MockLlm::new();
        llm.expect_summarize().times(1).returning(|system, prompt| {
            assert!(system.contains("equity analyst"));
            assert!(prompt.contains("[Symbol] AAPL"));
            assert!(prompt.contains("- PE: 12.00"));
            Ok("Hold with a positive bias".to_string())
        });

        let service = AnalysisService::new(Arc::new(repo_with_history()), AnalysisConfig::default());
        let analysis = service.ai_analysis("AAPL", &llm).await.unwrap();
        assert_eq!(analysis.confidence, 80);
        assert_eq!(analysis.summary, "Hold with a positive bias");
    }

    #[tokio::test]
    async fn test_ai_analysis_degrades_on_summarizer_failure() {
        let mut llm = MockLlm::new();
        llm.expect_summarize()
            .returning(|_, _| Err(StockError::SummarizerError("rate limited".to_string())));

        let service = AnalysisService::new(Arc::new(repo_with_history()), AnalysisConfig::default());
        let analysis = service.ai_analysis("AAPL", &llm).await.unwrap();
        assert_eq!(analysis.confidence, 0);
        assert!(analysis.summary.starts_with("Analysis failed"));
        assert!(analysis.summary.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_scan_alerts_with_empty_watchlist() {
        let mut repo = MockRepo::new();
        repo.expect_fetch_watchlist().times(1).returning(|| Ok(Vec::new()));

        let service = AnalysisService::new(Arc::new(repo), AnalysisConfig::default());
        let report = service.scan_alerts().await.unwrap();
        assert!(report.succeeded.is_empty());
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_service_over_trait_object() {
        let mut repo = MockRepo::new();
        repo.expect_fetch_watchlist().returning(|| Ok(Vec::new()));

        let repo: Arc<dyn Repository> = Arc::new(repo);
        let service = AnalysisService::new(repo, AnalysisConfig::default());
        let report = service
            .screen("value", &StrategyParams::new(), Market::Us)
            .await
            .unwrap();
        assert!(report.succeeded.is_empty());
    }
}
