//! Symbol universe records and the source seam.

use crate::error::Result;
use crate::gics::GicsSector;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A tradeable symbol in the screening universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Ticker symbol as understood by the metric provider.
    pub ticker: String,
    /// Security name.
    pub name: String,
    /// GICS sector, when the source publishes one.
    pub sector: Option<GicsSector>,
}

impl SymbolRecord {
    /// Create a new record without sector information.
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            sector: None,
        }
    }

    /// Attach a GICS sector.
    pub const fn with_sector(mut self, sector: GicsSector) -> Self {
        self.sector = Some(sector);
        self
    }
}

/// Supplies the universe of symbols for a screening run.
///
/// Implementations fail with [`crate::DataError::SourceUnavailable`] when the
/// universe cannot be retrieved or parsed; a run never proceeds on a partial universe.
pub trait SymbolSource {
    /// Fetch every symbol in the universe, in source order.
    fn fetch_universe(&self) -> impl Future<Output = Result<Vec<SymbolRecord>>> + Send;
}

/// Extract tickers in universe order.
pub fn tickers(records: &[SymbolRecord]) -> Vec<String> {
    records.iter().map(|r| r.ticker.clone()).collect()
}
