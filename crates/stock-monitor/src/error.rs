//! Error types for the monitor

use stock_analysis::StockError;
use thiserror::Error;

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Scheduler lifecycle and scan errors
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Scheduler is already running")]
    AlreadyRunning,

    #[error("Scheduler is not running")]
    NotRunning,

    /// A scan failed after all retries
    #[error("Scan failed: {0}")]
    Scan(#[from] StockError),

    #[error("Scheduler task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(MonitorError::AlreadyRunning.to_string(), "Scheduler is already running");

        let err: MonitorError = StockError::Other("boom".to_string()).into();
        assert_eq!(err.to_string(), "Scan failed: boom");
    }
}
