//! Fundamental analyzer
//!
//! Scores valuation, profitability, growth and financial health from periodic
//! statements and combines them with fixed weights.

pub mod narrative;
pub mod scores;

use crate::report::{FundamentalReport, GrowthResult, HealthResult, ProfitabilityResult, ValuationResult};
use chrono::NaiveDate;
use stock_core::{FinancialStatement, sort_statements};
use tracing::{info, warn};

const VALUATION_WEIGHT: f64 = 0.25;
const PROFITABILITY_WEIGHT: f64 = 0.30;
const GROWTH_WEIGHT: f64 = 0.25;
const HEALTH_WEIGHT: f64 = 0.20;

/// Stateless fundamental analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct FundamentalAnalyzer;

impl FundamentalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze `statements` (any order) as of `analysis_date`
    pub fn analyze(
        &self,
        symbol: &str,
        statements: &[FinancialStatement],
        analysis_date: NaiveDate,
    ) -> FundamentalReport {
        if statements.is_empty() {
            warn!(symbol, "No financial statements for fundamental analysis");
            return FundamentalReport::no_data(symbol, analysis_date);
        }

        let mut statements = statements.to_vec();
        sort_statements(&mut statements);

        let valuation = scores::valuation(&statements);
        let profitability = scores::profitability(&statements);
        let growth = scores::growth(&statements);
        let health = scores::health(&statements);
        let score = composite_score(&valuation, &profitability, &growth, &health);
        let summary = narrative::narrative(&valuation, &profitability, &growth, &health, score);

        info!(symbol, score, "Fundamental analysis completed");

        FundamentalReport {
            symbol: symbol.to_string(),
            analysis_date,
            valuation: Some(valuation),
            profitability: Some(profitability),
            growth: Some(growth),
            health: Some(health),
            score,
            summary,
        }
    }
}

/// Weighted sum of the four sub-scores, rounded half to even
pub fn composite_score(
    valuation: &ValuationResult,
    profitability: &ProfitabilityResult,
    growth: &GrowthResult,
    health: &HealthResult,
) -> u8 {
    let weighted = f64::from(valuation.score) * VALUATION_WEIGHT
        + f64::from(profitability.score) * PROFITABILITY_WEIGHT
        + f64::from(growth.score) * GROWTH_WEIGHT
        + f64::from(health.score) * HEALTH_WEIGHT;
    weighted.round_ties_even().clamp(0.0, 100.0) as u8
}
