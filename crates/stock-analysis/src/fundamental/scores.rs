//! Fundamental sub-scores
//!
//! Every function expects statements most recent first and tolerates any
//! metric being absent.

use crate::report::{
    GrowthResult, HealthResult, MetricTrend, ProfitabilityResult, ValuationResult, clamp_score,
};
use stock_core::FinancialStatement;

const BASE: i32 = 50;
/// Periods making up the three-year window (quarterly statements)
const THREE_YEAR_PERIODS: usize = 12;

/// PE and PB against fixed valuation bands
pub fn valuation(statements: &[FinancialStatement]) -> ValuationResult {
    let Some(latest) = statements.first() else {
        return ValuationResult { score: 50, ..Default::default() };
    };

    let mut score = BASE;
    let mut is_undervalued = None;

    if let Some(pe) = latest.pe {
        let (bonus, cheap) = pe_bonus(pe);
        score += bonus;
        is_undervalued = Some(cheap);
    }

    if let Some(pb) = latest.pb.filter(|pb| *pb > 0.0) {
        score += if pb < 1.0 {
            15
        } else if pb < 2.0 {
            5
        } else if pb > 5.0 {
            -10
        } else {
            0
        };
    }

    ValuationResult {
        pe: latest.pe,
        pb: latest.pb,
        is_undervalued,
        score: clamp_score(score),
    }
}

/// Bonus and undervalued flag for one PE reading; loss makers are never cheap
fn pe_bonus(pe: f64) -> (i32, bool) {
    if pe <= 0.0 {
        (-20, false)
    } else if pe < 15.0 {
        (20, true)
    } else if pe < 25.0 {
        (10, false)
    } else if pe < 40.0 {
        (0, false)
    } else {
        (-10, false)
    }
}

/// Current ROE, its trend over the three-year window and gross margin
pub fn profitability(statements: &[FinancialStatement]) -> ProfitabilityResult {
    let Some(latest) = statements.first() else {
        return ProfitabilityResult { score: 50, ..Default::default() };
    };

    let roe_values: Vec<f64> = statements
        .iter()
        .take(THREE_YEAR_PERIODS)
        .filter_map(|s| s.roe)
        .collect();
    let roe_avg_3y = mean(&roe_values);
    let roe_trend = roe_trend(&roe_values);

    let mut score = BASE;
    if let Some(roe) = latest.roe {
        score += if roe > 20.0 {
            25
        } else if roe > 15.0 {
            15
        } else if roe > 10.0 {
            5
        } else if roe > 5.0 {
            0
        } else {
            -10
        };
    }
    score += trend_bonus(roe_trend);

    if let Some(margin) = latest.gross_margin {
        score += if margin > 40.0 {
            10
        } else if margin > 20.0 {
            5
        } else if margin < 10.0 {
            -5
        } else {
            0
        };
    }

    ProfitabilityResult {
        roe_current: latest.roe,
        roe_avg_3y,
        gross_margin: latest.gross_margin,
        roe_trend,
        score: clamp_score(score),
    }
}

/// Mean of the three most recent ROE values against the next three
///
/// Needs at least three values; with fewer than six there is nothing to
/// compare against and the trend is stable.
fn roe_trend(values: &[f64]) -> MetricTrend {
    if values.len() < 6 {
        return MetricTrend::Stable;
    }
    match (mean(&values[..3]), mean(&values[3..6])) {
        (Some(recent), Some(older)) => MetricTrend::classify(recent, older),
        _ => MetricTrend::Stable,
    }
}

/// Year-over-year revenue and profit growth plus three-year revenue CAGR
pub fn growth(statements: &[FinancialStatement]) -> GrowthResult {
    let [latest, previous, ..] = statements else {
        return GrowthResult { score: 50, ..Default::default() };
    };

    let revenue_yoy = yoy(latest.revenue, previous.revenue);
    let profit_yoy = yoy(latest.net_profit, previous.net_profit);
    let revenue_cagr_3y = revenue_cagr(statements);

    let mut score = BASE;
    score += revenue_yoy.map_or(0, yoy_bonus);
    score += profit_yoy.map_or(0, yoy_bonus);
    if let Some(cagr) = revenue_cagr_3y {
        score += if cagr > 20.0 {
            10
        } else if cagr > 10.0 {
            5
        } else {
            0
        };
    }

    GrowthResult {
        revenue_yoy,
        profit_yoy,
        revenue_cagr_3y,
        score: clamp_score(score),
    }
}

/// Percent change, only when both periods report a non-zero value
fn yoy(latest: Option<f64>, previous: Option<f64>) -> Option<f64> {
    match (latest, previous) {
        (Some(l), Some(p)) if l != 0.0 && p != 0.0 => Some((l - p) / p * 100.0),
        _ => None,
    }
}

fn yoy_bonus(pct: f64) -> i32 {
    if pct > 30.0 {
        20
    } else if pct > 15.0 {
        10
    } else if pct > 5.0 {
        5
    } else if pct < -10.0 {
        -15
    } else if pct < 0.0 {
        -5
    } else {
        0
    }
}

/// Revenue CAGR between the oldest and latest statement, in percent
///
/// Needs a full three-year window of periods; the exponent uses elapsed days / 365.
fn revenue_cagr(statements: &[FinancialStatement]) -> Option<f64> {
    if statements.len() < THREE_YEAR_PERIODS {
        return None;
    }
    let latest = statements.first()?;
    let oldest = statements.last()?;
    let (end, start) = (latest.revenue?, oldest.revenue?);
    if end <= 0.0 || start <= 0.0 {
        return None;
    }
    let years = (latest.report_date - oldest.report_date).num_days() as f64 / 365.0;
    if years <= 0.0 {
        return None;
    }
    Some(((end / start).powf(1.0 / years) - 1.0) * 100.0)
}

/// Debt ratio band and its trend over the four most recent periods
pub fn health(statements: &[FinancialStatement]) -> HealthResult {
    let Some(latest) = statements.first() else {
        return HealthResult { score: 50, ..Default::default() };
    };

    let ratios: Vec<f64> = statements.iter().take(4).filter_map(|s| s.debt_ratio).collect();
    let debt_trend = if ratios.len() == 4 {
        MetricTrend::classify((ratios[0] + ratios[1]) / 2.0, (ratios[2] + ratios[3]) / 2.0)
    } else {
        MetricTrend::Stable
    };

    let mut score = BASE;
    if let Some(debt) = latest.debt_ratio {
        score += if debt < 30.0 {
            25
        } else if debt < 50.0 {
            15
        } else if debt < 70.0 {
            0
        } else {
            -20
        };
    }
    // Rising leverage is penalized
    score -= trend_bonus(debt_trend);

    HealthResult {
        debt_ratio: latest.debt_ratio,
        debt_trend,
        score: clamp_score(score),
    }
}

fn trend_bonus(trend: MetricTrend) -> i32 {
    match trend {
        MetricTrend::Rising => 10,
        MetricTrend::Stable => 0,
        MetricTrend::Falling => -10,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}
