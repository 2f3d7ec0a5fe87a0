//! Error types for indicator calculations

use thiserror::Error;

/// Result type alias for indicator calculations
pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Indicator calculation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// The series is shorter than the indicator's lookback
    #[error("{indicator} needs at least {required} bars, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    /// A period or multiplier is out of range, or input columns disagree in length
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl IndicatorError {
    pub(crate) fn require(indicator: &'static str, required: usize, actual: usize) -> Result<()> {
        if actual < required {
            return Err(Self::InsufficientData {
                indicator,
                required,
                actual,
            });
        }
        Ok(())
    }

    pub(crate) fn positive_period(name: &str, period: usize) -> Result<()> {
        if period == 0 {
            return Err(Self::InvalidParameter(format!("{name} must be greater than 0")));
        }
        Ok(())
    }
}

impl From<ta::errors::TaError> for IndicatorError {
    fn from(err: ta::errors::TaError) -> Self {
        IndicatorError::InvalidParameter(format!("{err:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndicatorError::InsufficientData {
            indicator: "MACD",
            required: 26,
            actual: 10,
        };
        assert_eq!(err.to_string(), "MACD needs at least 26 bars, got 10");
    }

    #[test]
    fn test_require() {
        assert!(IndicatorError::require("RSI", 14, 14).is_ok());
        assert!(IndicatorError::require("RSI", 14, 13).is_err());
        assert!(IndicatorError::positive_period("period", 0).is_err());
    }
}
