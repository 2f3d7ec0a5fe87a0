//! Error types for stock analysis operations

use stock_indicators::IndicatorError;
use thiserror::Error;

/// Stock analysis specific errors
///
/// Insufficient history is not an error here: analyzers return a sentinel
/// report instead.
#[derive(Debug, Error)]
pub enum StockError {
    /// The persistence collaborator failed
    #[error("Repository error: {0}")]
    Repository(#[from] stock_core::Error),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    /// No strategy with this identifier in the registry
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    /// A strategy parameter is outside its accepted values
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The summarizer collaborator failed
    #[error("Summarizer error: {0}")]
    SummarizerError(String),

    /// Prompt template failed to compile or render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl StockError {
    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StockError::Repository(err) if err.is_transient())
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
