//! Error types for screening runs.

use rvscreen_data::DataError;
use rvscreen_output::ExportError;
use rvscreen_rank::RankError;
use thiserror::Error;

/// Result type for screening operations.
pub type Result<T> = std::result::Result<T, ScreenError>;

/// Rejected budgets and impossible allocations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// Budget text did not parse as a number.
    #[error("invalid amount: {0:?} is not a number")]
    NotANumber(String),

    /// Budget below zero.
    #[error("cannot have a negative portfolio size: {0}")]
    NegativeBudget(f64),

    /// NaN or infinite budget.
    #[error("portfolio size must be a finite number")]
    NonFiniteBudget,

    /// Nothing to allocate across.
    #[error("no positions to allocate across")]
    NoPositions,
}

/// Errors that can end a screening run.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// Symbol source or metric provider failure.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Imputation, scoring or ranking failure.
    #[error("ranking error: {0}")]
    Rank(#[from] RankError),

    /// Invalid budget or allocation.
    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Report could not be written.
    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvscreen_rank::Metric;

    #[test]
    fn test_error_messages() {
        let err = ScreenError::from(AllocationError::NegativeBudget(-5.0));
        assert_eq!(
            err.to_string(),
            "allocation error: cannot have a negative portfolio size: -5"
        );

        let err = ScreenError::from(RankError::DegenerateColumn {
            metric: Metric::PriceToBook,
        });
        assert!(err.to_string().starts_with("ranking error:"));
        assert!(err.to_string().contains("P/B"));
    }
}
