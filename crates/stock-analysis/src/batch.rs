//! Per-symbol outcomes of a batch operation

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One symbol that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: String,
}

/// Results of a scan or screen across many symbols
///
/// A failing symbol never aborts its siblings; it is recorded here instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport<T> {
    pub succeeded: Vec<T>,
    pub failures: Vec<SymbolFailure>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful item
    pub fn push(&mut self, item: T) {
        self.succeeded.push(item);
    }

    /// Record a failed symbol
    pub fn fail(&mut self, symbol: impl Into<String>, error: impl Display) {
        self.failures.push(SymbolFailure {
            symbol: symbol.into(),
            error: error.to_string(),
        });
    }

    /// No symbol failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_report_accumulates() {
        let mut report = BatchReport::new();
        assert!(report.is_clean());
        report.push(1);
        report.fail("AAPL", "timeout");
        report.push(2);
        assert!(!report.is_clean());

        assert_eq!(report.succeeded, vec![1, 2]);
        assert_eq!(report.failures[0].symbol, "AAPL");
        assert_eq!(report.failures[0].error, "timeout");
    }
}
