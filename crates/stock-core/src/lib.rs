//! Core data model and collaborator contracts for stock-rs
//!
//! This crate defines the values every other crate in the workspace passes
//! around (price bars, financial statements, watch-list entries, alert
//! events) and the repository contract the analysis engine reads from.

pub mod error;
pub mod model;
pub mod repository;

pub use error::{Error, Result};
pub use model::{
    AlertEvent, AlertKind, FinancialStatement, Market, PriceBar, StockInfo, WatchlistEntry,
    sort_bars, sort_statements,
};
pub use repository::Repository;
