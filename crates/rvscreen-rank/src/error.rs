//! Error types for the ranking stages.

use crate::metric::Metric;
use thiserror::Error;

/// Result type for ranking operations.
pub type Result<T> = std::result::Result<T, RankError>;

/// Errors raised while imputing, scoring or ranking a metric table.
#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    /// A ranking column has no values for any symbol.
    #[error("Degenerate column: no symbol has a {metric} value")]
    DegenerateColumn {
        /// The empty column
        metric: Metric,
    },

    /// The table has no rows.
    #[error("Empty metric table")]
    EmptyTable,

    /// Every ranking column was skipped, so no RV score can be formed.
    #[error("No ranking metric could be scored")]
    NoScorableMetrics,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
