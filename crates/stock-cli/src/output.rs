//! Terminal rendering for reports

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use stock_analysis::{
    BatchReport, FundamentalReport, ScreenResult, Strategy, TechnicalReport,
};
use stock_core::AlertEvent;

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}{suffix}"))
}

pub fn technical_table(report: &TechnicalReport) -> Table {
    let mut table = table(&["Item", "Value"]);
    table.add_row(vec!["Symbol".to_string(), report.symbol.clone()]);
    table.add_row(vec!["Date".to_string(), report.analysis_date.to_string()]);
    table.add_row(vec!["Score".to_string(), report.score.to_string()]);

    if let Some(trend) = &report.trend {
        table.add_row(vec!["Price".to_string(), format!("{:.2}", trend.current_price)]);
        table.add_row(vec!["Trend".to_string(), trend.direction.to_string()]);
        table.add_row(vec![
            "Short / mid".to_string(),
            format!("{} / {}", trend.short_trend, trend.mid_trend),
        ]);
    }
    if let Some(ind) = &report.indicators {
        for period in [5, 10, 20, 60] {
            table.add_row(vec![format!("MA{period}"), fmt_opt(ind.ma(period), "")]);
        }
        if let Some(m) = &ind.macd {
            table.add_row(vec![
                "MACD".to_string(),
                format!("DIF {:.3}  DEA {:.3}  HIST {:.3}", m.dif, m.dea, m.histogram),
            ]);
        }
        if let Some(k) = &ind.kdj {
            table.add_row(vec!["KDJ".to_string(), format!("K {:.1}  D {:.1}  J {:.1}", k.k, k.d, k.j)]);
        }
        table.add_row(vec!["RSI(14)".to_string(), fmt_opt(ind.rsi, "")]);
        if let Some(b) = &ind.bollinger {
            table.add_row(vec![
                "Bollinger".to_string(),
                format!("{:.2} / {:.2} / {:.2}", b.upper, b.middle, b.lower),
            ]);
        }
        table.add_row(vec!["ATR(14)".to_string(), fmt_opt(ind.atr, "")]);
    }
    if let Some(levels) = &report.support_resistance {
        table.add_row(vec![
            "Resistance".to_string(),
            format!("{:.2} / {}", levels.resistance_1, fmt_opt(levels.resistance_2, "")),
        ]);
        table.add_row(vec![
            "Support".to_string(),
            format!("{:.2} / {}", levels.support_1, fmt_opt(levels.support_2, "")),
        ]);
    }
    if !report.patterns.is_empty() {
        let labels: Vec<&str> = report.patterns.iter().map(|p| p.label()).collect();
        table.add_row(vec!["Patterns".to_string(), labels.join(", ")]);
    }
    if let Some(summary) = &report.summary {
        table.add_row(vec!["Summary".to_string(), summary.clone()]);
    }
    table
}

pub fn fundamental_table(report: &FundamentalReport) -> Table {
    let mut table = table(&["Item", "Value", "Score"]);
    table.add_row(vec!["Symbol", report.symbol.as_str(), ""]);
    table.add_row(vec!["Overall".to_string(), String::new(), report.score.to_string()]);

    if let Some(v) = &report.valuation {
        table.add_row(vec![
            "Valuation".to_string(),
            format!("PE {}  PB {}", fmt_opt(v.pe, ""), fmt_opt(v.pb, "")),
            v.score.to_string(),
        ]);
    }
    if let Some(p) = &report.profitability {
        table.add_row(vec![
            "Profitability".to_string(),
            format!("ROE {}  trend {}", fmt_opt(p.roe_current, "%"), p.roe_trend),
            p.score.to_string(),
        ]);
    }
    if let Some(g) = &report.growth {
        table.add_row(vec![
            "Growth".to_string(),
            format!(
                "revenue {}  profit {}",
                fmt_opt(g.revenue_yoy, "%"),
                fmt_opt(g.profit_yoy, "%")
            ),
            g.score.to_string(),
        ]);
    }
    if let Some(h) = &report.health {
        table.add_row(vec![
            "Health".to_string(),
            format!("debt {}  trend {}", fmt_opt(h.debt_ratio, "%"), h.debt_trend),
            h.score.to_string(),
        ]);
    }
    table.add_row(vec!["Summary".to_string(), report.summary.clone(), String::new()]);
    table
}

pub fn alerts_table(report: &BatchReport<AlertEvent>) -> Table {
    let mut table = table(&["Symbol", "Kind", "Message", "Triggered"]);
    for alert in &report.succeeded {
        table.add_row(vec![
            alert.symbol.clone(),
            alert.kind.to_string(),
            alert.message.clone(),
            alert.triggered_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    table
}

pub fn screen_table(report: &BatchReport<ScreenResult>) -> Table {
    let mut table = table(&["Symbol", "Name", "Score", "Price", "Details"]);
    for result in &report.succeeded {
        let details: Vec<String> = result
            .match_details
            .iter()
            .map(|(key, value)| format!("{key}={value:.2}"))
            .collect();
        table.add_row(vec![
            result.symbol.clone(),
            result.name.clone(),
            format!("{:.1}", result.score),
            fmt_opt(result.current_price, ""),
            details.join(" "),
        ]);
    }
    table
}

pub fn strategies_table(strategies: &[Strategy]) -> Table {
    let mut table = table(&["Id", "Name", "Category", "Defaults", "Description"]);
    for strategy in strategies {
        let params: Vec<String> = strategy
            .params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        table.add_row(vec![
            strategy.id().to_string(),
            strategy.name.clone(),
            strategy.category.to_string(),
            params.join(" "),
            strategy.description.clone(),
        ]);
    }
    table
}

/// Print per-symbol failures of a batch to stderr
pub fn print_failures<T>(report: &BatchReport<T>) {
    for failure in &report.failures {
        eprintln!("warning: {} skipped: {}", failure.symbol, failure.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[test]
    fn test_insufficient_technical_table() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let report = TechnicalReport::insufficient("AAPL", date, 4);
        let rendered = technical_table(&report).to_string();
        assert!(rendered.contains("AAPL"));
        assert!(rendered.contains("4 bars"));
    }

    #[test]
    fn test_screen_table_rows() {
        let mut report = BatchReport::new();
        report.push(ScreenResult {
            symbol: "600519.SH".to_string(),
            name: "Moutai".to_string(),
            score: 72.5,
            match_details: BTreeMap::from([("pe".to_string(), 12.0)]),
            current_price: None,
        });

        let rendered = screen_table(&report).to_string();
        assert!(rendered.contains("Moutai"));
        assert!(rendered.contains("72.5"));
        assert!(rendered.contains("pe=12.00"));
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(None, "%"), "-");
        assert_eq!(fmt_opt(Some(1.234), "%"), "1.23%");
    }
}
