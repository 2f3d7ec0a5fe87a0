//! Strategy-driven stock screener

use super::strategies::{StrategyKind, StrategyParams, StrategyRegistry};
use crate::batch::BatchReport;
use crate::config::AnalysisConfig;
use crate::error::{Result, StockError};
use crate::fundamental::FundamentalAnalyzer;
use crate::technical::TechnicalAnalyzer;
use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use stock_core::{FinancialStatement, Market, PriceBar, Repository, StockInfo, sort_statements};
use tracing::{debug, info, warn};

/// Statement window for the valuation strategies
const VALUATION_STATEMENT_YEARS: u32 = 1;
/// Moving-average periods the momentum strategy accepts
pub const MOMENTUM_MA_PERIODS: [usize; 3] = [5, 20, 60];

/// One symbol that passed a strategy's filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    pub symbol: String,
    pub name: String,
    /// Strategy score, 0..=100
    pub score: f64,
    /// Metrics the filter looked at
    pub match_details: BTreeMap<String, f64>,
    pub current_price: Option<f64>,
}

impl ScreenResult {
    fn new(info: &StockInfo, score: f64) -> Self {
        Self {
            symbol: info.symbol.clone(),
            name: info.name.clone(),
            score,
            match_details: BTreeMap::new(),
            current_price: None,
        }
    }

    fn with_detail(mut self, key: impl Into<String>, value: f64) -> Self {
        self.match_details.insert(key.into(), value);
        self
    }

    fn with_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }
}

/// Strategy parameters resolved to the values scoring needs
#[derive(Debug, Clone, Copy, PartialEq)]
enum Plan {
    Value { max_pe: f64, max_pb: f64 },
    Growth { min_revenue_growth: f64, min_profit_growth: f64 },
    LowPe { max_pe: f64 },
    Momentum { ma_period: usize },
}

impl Plan {
    fn resolve(kind: StrategyKind, params: &StrategyParams) -> Result<Self> {
        let plan = match kind {
            StrategyKind::Value => Plan::Value {
                max_pe: positive(params, "max_pe", 15.0)?,
                max_pb: positive(params, "max_pb", 2.0)?,
            },
            StrategyKind::Growth => Plan::Growth {
                min_revenue_growth: param(params, "min_revenue_growth", 20.0),
                min_profit_growth: param(params, "min_profit_growth", 15.0),
            },
            StrategyKind::LowPe => Plan::LowPe {
                max_pe: positive(params, "max_pe", 10.0)?,
            },
            StrategyKind::Momentum => {
                let raw = param(params, "ma_period", 20.0);
                let ma_period = MOMENTUM_MA_PERIODS
                    .into_iter()
                    .find(|p| *p as f64 == raw)
                    .ok_or_else(|| StockError::InvalidParameter {
                        name: "ma_period".to_string(),
                        reason: format!("must be one of 5, 20, 60, got {raw}"),
                    })?;
                Plan::Momentum { ma_period }
            }
        };
        Ok(plan)
    }
}

fn param(params: &StrategyParams, name: &str, default: f64) -> f64 {
    params.get(name).copied().unwrap_or(default)
}

fn positive(params: &StrategyParams, name: &str, default: f64) -> Result<f64> {
    let value = param(params, name, default);
    if value > 0.0 {
        Ok(value)
    } else {
        Err(StockError::InvalidParameter {
            name: name.to_string(),
            reason: format!("must be positive, got {value}"),
        })
    }
}

/// Applies a registered strategy across the watch-list of one market
#[derive(Debug, Clone)]
pub struct Screener {
    registry: Arc<StrategyRegistry>,
    config: AnalysisConfig,
    technical: TechnicalAnalyzer,
    fundamental: FundamentalAnalyzer,
}

impl Screener {
    pub fn new(registry: Arc<StrategyRegistry>, config: AnalysisConfig) -> Self {
        Self {
            registry,
            config,
            technical: TechnicalAnalyzer::new(),
            fundamental: FundamentalAnalyzer::new(),
        }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Run `strategy_id` with `overrides` merged onto its defaults
    ///
    /// Symbols lacking data or failing the filter are left out silently.
    /// Symbols whose reads fail are reported in `failures`. Results are sorted
    /// by score, highest first.
    pub async fn screen<R>(
        &self,
        repo: &R,
        strategy_id: &str,
        overrides: &StrategyParams,
        market: Market,
        as_of: NaiveDate,
    ) -> Result<BatchReport<ScreenResult>>
    where
        R: Repository + ?Sized,
    {
        let strategy = self.registry.resolve(strategy_id)?;
        let plan = Plan::resolve(strategy.kind, &strategy.merged_params(overrides))?;

        let (pool, mut report) = self.stock_pool(repo, market).await?;
        debug!(strategy = strategy_id, %market, candidates = pool.len(), "Screening stock pool");

        let outcomes = join_all(pool.iter().map(|info| self.evaluate(repo, info, plan, as_of))).await;
        for (info, outcome) in pool.iter().zip(outcomes) {
            match outcome {
                Ok(Some(result)) => report.push(result),
                Ok(None) => {}
                Err(err) => {
                    warn!(symbol = %info.symbol, error = %err, "Screening failed for symbol");
                    report.fail(&info.symbol, err);
                }
            }
        }

        report.succeeded.sort_by(|a, b| b.score.total_cmp(&a.score));
        info!(
            strategy = strategy_id,
            matched = report.succeeded.len(),
            failures = report.failures.len(),
            "Screening completed"
        );
        Ok(report)
    }

    /// Watch-list symbols listed on `market`
    async fn stock_pool<R>(&self, repo: &R, market: Market) -> Result<(Vec<StockInfo>, BatchReport<ScreenResult>)>
    where
        R: Repository + ?Sized,
    {
        let watchlist = repo.fetch_watchlist().await?;
        let mut report = BatchReport::new();
        let mut pool = Vec::with_capacity(watchlist.len());

        for entry in watchlist {
            match repo.fetch_stock_info(&entry.symbol).await {
                Ok(Some(info)) if info.market == market => pool.push(info),
                Ok(_) => {}
                Err(err) => report.fail(&entry.symbol, err),
            }
        }
        Ok((pool, report))
    }

    async fn evaluate<R>(&self, repo: &R, info: &StockInfo, plan: Plan, as_of: NaiveDate) -> Result<Option<ScreenResult>>
    where
        R: Repository + ?Sized,
    {
        let result = match plan {
            Plan::Value { max_pe, max_pb } => {
                let statements = repo.fetch_statements(&info.symbol, VALUATION_STATEMENT_YEARS).await?;
                value_candidate(info, &statements, max_pe, max_pb)
            }
            Plan::LowPe { max_pe } => {
                let statements = repo.fetch_statements(&info.symbol, VALUATION_STATEMENT_YEARS).await?;
                low_pe_candidate(info, &statements, max_pe)
            }
            Plan::Growth {
                min_revenue_growth,
                min_profit_growth,
            } => {
                let statements = repo
                    .fetch_statements(&info.symbol, self.config.growth_statement_years)
                    .await?;
                self.growth_candidate(info, &statements, min_revenue_growth, min_profit_growth, as_of)
            }
            Plan::Momentum { ma_period } => {
                let bars = repo
                    .fetch_price_bars(&info.symbol, self.config.momentum_lookback_days)
                    .await?;
                self.momentum_candidate(info, &bars, ma_period, as_of)
            }
        };
        Ok(result)
    }

    fn growth_candidate(
        &self,
        info: &StockInfo,
        statements: &[FinancialStatement],
        min_revenue_growth: f64,
        min_profit_growth: f64,
        as_of: NaiveDate,
    ) -> Option<ScreenResult> {
        let report = self.fundamental.analyze(&info.symbol, statements, as_of);
        let growth = report.growth?;
        let revenue_yoy = growth.revenue_yoy.unwrap_or(0.0);
        let profit_yoy = growth.profit_yoy.unwrap_or(0.0);
        if revenue_yoy < min_revenue_growth || profit_yoy < min_profit_growth {
            return None;
        }
        let score = ((revenue_yoy + profit_yoy) / 2.0).min(100.0);
        Some(
            ScreenResult::new(info, score)
                .with_detail("revenue_yoy", revenue_yoy)
                .with_detail("profit_yoy", profit_yoy),
        )
    }

    fn momentum_candidate(
        &self,
        info: &StockInfo,
        bars: &[PriceBar],
        ma_period: usize,
        as_of: NaiveDate,
    ) -> Option<ScreenResult> {
        let report = self.technical.analyze(&info.symbol, bars, as_of);
        let price = report.trend?.current_price;
        let ma = report.indicators?.ma(ma_period).filter(|ma| *ma > 0.0)?;
        if price <= ma {
            return None;
        }
        let score = ((price / ma - 1.0) * 200.0 + 50.0).min(100.0);
        Some(
            ScreenResult::new(info, score)
                .with_detail("current_price", price)
                .with_detail(format!("ma{ma_period}"), ma)
                .with_price(price),
        )
    }
}

/// Most recent statement, with PE and PB only when positive
fn latest_valuation(statements: &[FinancialStatement]) -> Option<(Option<f64>, Option<f64>)> {
    let mut statements = statements.to_vec();
    sort_statements(&mut statements);
    let latest = statements.first()?;
    Some((
        latest.pe.filter(|pe| *pe != 0.0),
        latest.pb.filter(|pb| *pb != 0.0),
    ))
}

/// Value strategy: both PE and PB under their ceilings
pub fn value_candidate(
    info: &StockInfo,
    statements: &[FinancialStatement],
    max_pe: f64,
    max_pb: f64,
) -> Option<ScreenResult> {
    let (Some(pe), Some(pb)) = latest_valuation(statements)? else {
        return None;
    };
    if pe > max_pe || pb > max_pb {
        return None;
    }
    let score = ((1.0 - pe / max_pe) * 50.0 + (1.0 - pb / max_pb) * 50.0).clamp(0.0, 100.0);
    Some(
        ScreenResult::new(info, score)
            .with_detail("pe", pe)
            .with_detail("pb", pb),
    )
}

/// Low-PE strategy: PE under its ceiling
pub fn low_pe_candidate(info: &StockInfo, statements: &[FinancialStatement], max_pe: f64) -> Option<ScreenResult> {
    let (pe, _) = latest_valuation(statements)?;
    let pe = pe.filter(|pe| *pe <= max_pe)?;
    let score = (100.0 - pe * 5.0).clamp(0.0, 100.0);
    Some(ScreenResult::new(info, score).with_detail("pe", pe))
}
