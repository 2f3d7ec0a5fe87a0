//! Short heuristic narrative for a fundamental report

use crate::report::{GrowthResult, HealthResult, MetricTrend, ProfitabilityResult, ValuationResult};

const NO_DATA: &str = "Not enough data for analysis";

/// Join every qualifying callout into one sentence
pub fn narrative(
    valuation: &ValuationResult,
    profitability: &ProfitabilityResult,
    growth: &GrowthResult,
    health: &HealthResult,
    score: u8,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(
        match score {
            80.. => "Excellent fundamentals",
            60..=79 => "Good fundamentals",
            40..=59 => "Average fundamentals",
            _ => "Weak fundamentals",
        }
        .to_string(),
    );

    if valuation.is_undervalued == Some(true) {
        parts.push("valuation looks low".to_string());
    } else if valuation.pe.is_some_and(|pe| pe > 40.0) {
        parts.push("valuation looks high".to_string());
    }

    if let Some(roe) = profitability.roe_current.filter(|roe| *roe > 15.0) {
        parts.push(format!("ROE at {roe:.1}%"));
    }
    if profitability.roe_trend == MetricTrend::Rising {
        parts.push("profitability improving".to_string());
    }

    if let Some(pct) = growth.revenue_yoy.filter(|pct| *pct > 20.0) {
        parts.push(format!("revenue up {pct:.1}%"));
    }
    if let Some(pct) = growth.profit_yoy.filter(|pct| *pct > 20.0) {
        parts.push(format!("profit up {pct:.1}%"));
    }

    match health.debt_ratio {
        Some(debt) if debt > 0.0 && debt < 40.0 => parts.push("balance sheet is sound".to_string()),
        Some(debt) if debt > 70.0 => parts.push("leverage is high and worth watching".to_string()),
        _ => {}
    }

    if parts.is_empty() {
        NO_DATA.to_string()
    } else {
        parts.join(", ")
    }
}
