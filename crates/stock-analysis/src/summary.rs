//! AI summary collaborator

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confidence attached to a summary the model produced
pub const DEFAULT_CONFIDENCE: u8 = 80;

/// Produces a free-text summary from a system prompt and a user prompt
///
/// Implementations wrap a language model client. The engine never talks to a
/// model directly.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, system: &str, prompt: &str) -> Result<String>;
}

/// AI-generated commentary for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    pub summary: String,
    /// 0 when generation failed
    pub confidence: u8,
}

impl AiAnalysis {
    pub fn generated(symbol: impl Into<String>, summary: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            generated_at,
            summary: summary.into(),
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    pub fn failed(symbol: impl Into<String>, error: impl std::fmt::Display, generated_at: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            generated_at,
            summary: format!("Analysis failed: {error}"),
            confidence: 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.confidence == 0
    }
}
