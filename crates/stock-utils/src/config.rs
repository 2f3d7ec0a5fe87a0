//! Process-level configuration

use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the deployment environment
pub const ENV_APP_ENV: &str = "STOCK_APP_ENV";
/// Environment variable selecting the log format
pub const ENV_LOG_FORMAT: &str = "STOCK_LOG_FORMAT";

/// Error loading process configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set to a value that cannot be parsed
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// Log line format
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "stock-rs".to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Build from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(env) = lookup(ENV_APP_ENV) {
            config.environment = env;
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_format = format
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: ENV_LOG_FORMAT.to_string(),
                    reason,
                })?;
        }

        Ok(config)
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
