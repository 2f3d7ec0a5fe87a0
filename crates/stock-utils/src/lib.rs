//! Shared utilities for stock-rs
//!
//! This crate provides common functionality used across the stock-rs workspace,
//! including logging setup and process-level configuration.

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigError};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
