//! Screening engine

pub mod screener;
pub mod strategies;

pub use screener::{ScreenResult, Screener, low_pe_candidate, value_candidate};
pub use strategies::{Strategy, StrategyCategory, StrategyKind, StrategyParams, StrategyRegistry};
