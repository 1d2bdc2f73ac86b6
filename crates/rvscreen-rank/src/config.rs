//! Ranking configuration.

use crate::builder::TickerPolicy;
use crate::error::{RankError, Result};
use crate::impute::DegeneratePolicy;
use serde::{Deserialize, Serialize};

/// Symbols kept after ranking.
pub const DEFAULT_TOP_N: usize = 25;

/// Settings for the ranking stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Number of top-ranked symbols to keep (default: 25)
    pub top_n: usize,
    /// Handling of ranking columns with no values (default: fail)
    pub degenerate_policy: DegeneratePolicy,
    /// Handling of tickers for symbols without data (default: preserve)
    pub ticker_policy: TickerPolicy,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            degenerate_policy: DegeneratePolicy::default(),
            ticker_policy: TickerPolicy::default(),
        }
    }
}

impl RankConfig {
    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidConfig`] when `top_n` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(RankError::InvalidConfig("top_n must be at least 1".to_string()));
        }
        Ok(())
    }
}
