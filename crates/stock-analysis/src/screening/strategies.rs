//! Built-in screening strategy catalog

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Strategy identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Value,
    Growth,
    LowPe,
    Momentum,
}

impl StrategyKind {
    pub fn id(self) -> &'static str {
        match self {
            StrategyKind::Value => "value",
            StrategyKind::Growth => "growth",
            StrategyKind::LowPe => "low_pe",
            StrategyKind::Momentum => "momentum",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StrategyKind {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "value" => Ok(StrategyKind::Value),
            "growth" => Ok(StrategyKind::Growth),
            "low_pe" => Ok(StrategyKind::LowPe),
            "momentum" => Ok(StrategyKind::Momentum),
            other => Err(StockError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Catalog grouping shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyCategory {
    Value,
    Growth,
    Technical,
}

impl fmt::Display for StrategyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyCategory::Value => "value",
            StrategyCategory::Growth => "growth",
            StrategyCategory::Technical => "technical",
        })
    }
}

/// Named numeric parameters of a strategy
pub type StrategyParams = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub name: String,
    pub description: String,
    pub category: StrategyCategory,
    /// Defaults; some are catalogued for display and not used in scoring
    pub params: StrategyParams,
}

impl Strategy {
    fn new(
        kind: StrategyKind,
        name: &str,
        description: &str,
        category: StrategyCategory,
        params: &[(&str, f64)],
    ) -> Self {
        Self {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            category,
            params: params.iter().map(|(k, v)| ((*k).to_string(), *v)).collect(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    /// Defaults with `overrides` applied on top
    pub fn merged_params(&self, overrides: &StrategyParams) -> StrategyParams {
        let mut merged = self.params.clone();
        merged.extend(overrides.iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }
}

/// Read-only strategy lookup table
///
/// Built once and shared; nothing registers strategies at runtime.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    /// The four built-in strategies
    pub fn builtin() -> Self {
        use StrategyCategory as C;
        use StrategyKind as K;

        Self {
            strategies: vec![
                Strategy::new(
                    K::Value,
                    "Value Investing",
                    "Low PE, low PB, high dividend yield",
                    C::Value,
                    &[("max_pe", 15.0), ("max_pb", 2.0), ("min_dividend_yield", 3.0)],
                ),
                Strategy::new(
                    K::Growth,
                    "Growth",
                    "Strong revenue and profit growth",
                    C::Growth,
                    &[
                        ("min_revenue_growth", 20.0),
                        ("min_profit_growth", 15.0),
                        ("min_roe", 10.0),
                    ],
                ),
                Strategy::new(
                    K::LowPe,
                    "Low Valuation",
                    "PE below a set ceiling",
                    C::Value,
                    &[("max_pe", 10.0)],
                ),
                Strategy::new(
                    K::Momentum,
                    "Momentum",
                    "Price above its moving average on rising volume",
                    C::Technical,
                    &[("ma_period", 20.0), ("volume_multiplier", 1.5)],
                ),
            ],
        }
    }

    pub fn all(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn get(&self, id: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.id() == id)
    }

    /// Like [`get`](Self::get) but an unknown id is an error
    pub fn resolve(&self, id: &str) -> Result<&Strategy> {
        self.get(id)
            .ok_or_else(|| StockError::UnknownStrategy(id.to_string()))
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let registry = StrategyRegistry::builtin();
        let ids: Vec<&str> = registry.all().iter().map(Strategy::id).collect();
        assert_eq!(ids, vec!["value", "growth", "low_pe", "momentum"]);

        let momentum = registry.get("momentum").unwrap();
        assert_eq!(momentum.category, StrategyCategory::Technical);
        assert_eq!(momentum.params.get("volume_multiplier"), Some(&1.5));
    }

    #[test]
    fn test_unknown_strategy() {
        let registry = StrategyRegistry::builtin();
        assert!(registry.get("turtle").is_none());
        assert!(matches!(
            registry.resolve("turtle"),
            Err(StockError::UnknownStrategy(id)) if id == "turtle"
        ));
        assert!("turtle".parse::<StrategyKind>().is_err());
        assert_eq!("low_pe".parse::<StrategyKind>().unwrap(), StrategyKind::LowPe);
    }

    #[test]
    fn test_overrides_merge_onto_defaults() {
        let registry = StrategyRegistry::builtin();
        let value = registry.get("value").unwrap();
        let overrides = StrategyParams::from([("max_pe".to_string(), 20.0)]);

        let merged = value.merged_params(&overrides);
        assert_eq!(merged["max_pe"], 20.0);
        assert_eq!(merged["max_pb"], 2.0);
        // Defaults untouched
        assert_eq!(value.params["max_pe"], 15.0);
    }
}
