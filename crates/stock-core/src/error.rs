//! Error types for stock-core

use thiserror::Error;

/// Result type alias for stock-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by persistence collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// The backing store rejected or failed the operation
    #[error("Repository error: {0}")]
    Repository(String),

    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing store is temporarily unreachable
    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }
}
