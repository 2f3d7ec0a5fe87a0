//! Prompt templates for the AI summary
//!
//! Reports are flattened into `label: value` facts and rendered into the user
//! message with MiniJinja. Missing sections render a "no data" line instead of
//! an empty list.

use crate::error::Result;
use crate::report::{FundamentalReport, TechnicalReport};
use minijinja::Environment;
use serde::Serialize;

/// System prompt for the analyst persona
pub const SYSTEM_ANALYST: &str = r"You are a professional equity analyst skilled in both fundamental and technical analysis.

Your analysis should:
1. Stay objective and grounded in the data provided
2. Point out both risks and opportunities
3. Give a clear recommendation (buy / hold / sell) with reasons
4. Be concise and professional";

const STOCK_ANALYSIS: &str = r"Analyze the following stock and give an investment recommendation.

[Symbol] {{ symbol }}

[Fundamentals]
{% for fact in fundamental %}- {{ fact.label }}: {{ fact.value }}
{% else %}No fundamental data available
{% endfor %}
[Technicals]
{% for fact in technical %}- {{ fact.label }}: {{ fact.value }}
{% else %}No technical data available
{% endfor %}
Please provide:
1. An overall assessment (2-3 sentences)
2. A recommendation (buy / hold / sell) with reasons
3. Key risks
4. Price levels or indicators worth watching";

/// One `label: value` line in a prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub label: String,
    pub value: String,
}

impl Fact {
    fn new(label: &str, value: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Serialize)]
struct StockAnalysisVars<'a> {
    symbol: &'a str,
    fundamental: &'a [Fact],
    technical: &'a [Fact],
}

/// Render the user message for a stock summary
pub fn stock_analysis(symbol: &str, fundamental: &[Fact], technical: &[Fact]) -> Result<String> {
    let env = Environment::new();
    let vars = StockAnalysisVars {
        symbol,
        fundamental,
        technical,
    };
    Ok(env.render_str(STOCK_ANALYSIS, minijinja::Value::from_serialize(&vars))?)
}

fn push_opt(facts: &mut Vec<Fact>, label: &str, value: Option<f64>, suffix: &str) {
    if let Some(value) = value {
        facts.push(Fact::new(label, format!("{value:.2}{suffix}")));
    }
}

/// Facts drawn from a technical report, empty when history was insufficient
pub fn technical_facts(report: &TechnicalReport) -> Vec<Fact> {
    let mut facts = Vec::new();
    if report.is_insufficient() {
        return facts;
    }

    facts.push(Fact::new("Technical score", report.score));
    if let Some(trend) = &report.trend {
        facts.push(Fact::new("Current price", format!("{:.2}", trend.current_price)));
        facts.push(Fact::new("Trend", trend.direction));
        facts.push(Fact::new("Trend strength", format!("{:.0}%", trend.strength * 100.0)));
    }
    if let Some(ind) = &report.indicators {
        push_opt(&mut facts, "MA5", ind.ma5, "");
        push_opt(&mut facts, "MA20", ind.ma20, "");
        push_opt(&mut facts, "MA60", ind.ma60, "");
        if let Some(m) = &ind.macd {
            facts.push(Fact::new(
                "MACD",
                format!("DIF {:.3}, DEA {:.3}, histogram {:.3}", m.dif, m.dea, m.histogram),
            ));
        }
        if let Some(k) = &ind.kdj {
            facts.push(Fact::new("KDJ", format!("K {:.1}, D {:.1}, J {:.1}", k.k, k.d, k.j)));
        }
        push_opt(&mut facts, "RSI(14)", ind.rsi, "");
        push_opt(&mut facts, "ATR(14)", ind.atr, "");
    }
    if let Some(levels) = &report.support_resistance {
        facts.push(Fact::new("Resistance", format!("{:.2}", levels.resistance_1)));
        facts.push(Fact::new("Support", format!("{:.2}", levels.support_1)));
    }
    if !report.patterns.is_empty() {
        let labels: Vec<&str> = report.patterns.iter().map(|p| p.label()).collect();
        facts.push(Fact::new("Candle patterns", labels.join(", ")));
    }
    facts
}

/// Facts drawn from a fundamental report, empty when no statements existed
pub fn fundamental_facts(report: &FundamentalReport) -> Vec<Fact> {
    let mut facts = Vec::new();
    if report.valuation.is_none() && report.profitability.is_none() {
        return facts;
    }

    facts.push(Fact::new("Fundamental score", report.score));
    if let Some(v) = &report.valuation {
        push_opt(&mut facts, "PE", v.pe, "");
        push_opt(&mut facts, "PB", v.pb, "");
    }
    if let Some(p) = &report.profitability {
        push_opt(&mut facts, "ROE", p.roe_current, "%");
        push_opt(&mut facts, "Gross margin", p.gross_margin, "%");
        facts.push(Fact::new("ROE trend", p.roe_trend));
    }
    if let Some(g) = &report.growth {
        push_opt(&mut facts, "Revenue YoY", g.revenue_yoy, "%");
        push_opt(&mut facts, "Profit YoY", g.profit_yoy, "%");
    }
    if let Some(h) = &report.health {
        push_opt(&mut facts, "Debt ratio", h.debt_ratio, "%");
    }
    facts.push(Fact::new("Summary", &report.summary));
    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{TrendDirection, TrendResult, Direction, ValuationResult};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_render_with_facts() {
        let fundamental = vec![Fact::new("PE", "12.00")];
        let technical = vec![Fact::new("RSI(14)", "55.00"), Fact::new("Trend", "sideways")];

        let prompt = stock_analysis("600519.SH", &fundamental, &technical).unwrap();
        assert!(prompt.contains("[Symbol] 600519.SH"));
        assert!(prompt.contains("- PE: 12.00"));
        assert!(prompt.contains("- Trend: sideways"));
        assert!(!prompt.contains("No technical data"));
    }

    #[test]
    fn test_render_empty_sections() {
        let prompt = stock_analysis("AAPL", &[], &[]).unwrap();
        assert!(prompt.contains("No fundamental data available"));
        assert!(prompt.contains("No technical data available"));
    }

    #[test]
    fn test_insufficient_technical_report_has_no_facts() {
        let report = TechnicalReport::insufficient("AAPL", date(), 3);
        assert!(technical_facts(&report).is_empty());
    }

    #[test]
    fn test_technical_facts() {
        let mut report = TechnicalReport::insufficient("AAPL", date(), 0);
        report.trend = Some(TrendResult {
            direction: TrendDirection::StrongUp,
            short_trend: Direction::Up,
            mid_trend: Direction::Up,
            strength: 0.75,
            current_price: 101.5,
        });
        report.score = 80;

        let facts = technical_facts(&report);
        assert!(facts.contains(&Fact::new("Trend", "strong uptrend")));
        assert!(facts.contains(&Fact::new("Trend strength", "75%")));
        assert!(facts.contains(&Fact::new("Current price", "101.50")));
    }

    #[test]
    fn test_fundamental_facts() {
        assert!(fundamental_facts(&FundamentalReport::no_data("AAPL", date())).is_empty());

        let mut report = FundamentalReport::no_data("AAPL", date());
        report.valuation = Some(ValuationResult {
            pe: Some(12.0),
            pb: None,
            is_undervalued: Some(true),
            score: 80,
        });
        report.summary = "Good fundamentals".to_string();

        let facts = fundamental_facts(&report);
        assert!(facts.contains(&Fact::new("PE", "12.00")));
        assert!(facts.contains(&Fact::new("Summary", "Good fundamentals")));
        assert!(!facts.iter().any(|f| f.label == "PB"));
    }

    #[test]
    fn test_system_prompt() {
        assert!(SYSTEM_ANALYST.contains("buy / hold / sell"));
    }
}
