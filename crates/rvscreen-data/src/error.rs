//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading the symbol universe or fetching metrics.
#[derive(Debug, Error)]
pub enum DataError {
    /// The symbol universe could not be retrieved or parsed.
    #[error("Symbol source unavailable: {0}")]
    SourceUnavailable(String),

    /// The metric provider rejected or failed a request.
    #[error("Metric provider error: {0}")]
    Provider(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status returned by a remote service.
    #[error("HTTP {status} from {url}")]
    Http {
        /// Status code
        status: u16,
        /// Requested URL with credentials stripped
        url: String,
    },

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Missing or malformed configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Whether a failed request is worth repeating under the given status list.
    pub fn is_retryable(&self, retry_on_status: &[u16]) -> bool {
        match self {
            Self::Network(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            Self::Http { status, .. } => retry_on_status.contains(status),
            _ => false,
        }
    }
}
