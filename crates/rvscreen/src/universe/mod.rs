//! Symbol universes.
//!
//! A universe is the ordered, duplicate-free list of symbols a run screens.
//! Row order in the metric table follows universe order, which in turn
//! decides ranking ties.

pub mod static_universe;

pub use static_universe::StaticUniverse;

use rvscreen_data::{GicsSector, SymbolRecord};
use std::collections::HashMap;

/// Trait for symbol universes.
pub trait Universe {
    /// Records in universe order.
    fn records(&self) -> &[SymbolRecord];

    /// Get all symbols in the universe.
    fn symbols(&self) -> Vec<String> {
        rvscreen_data::symbols::tickers(self.records())
    }

    /// Check if a symbol is in the universe.
    fn contains(&self, symbol: &str) -> bool {
        self.records().iter().any(|r| r.ticker == symbol)
    }

    /// Get the number of constituents.
    fn size(&self) -> usize {
        self.records().len()
    }

    /// Get the count of constituents per sector, for records that carry one.
    fn sector_counts(&self) -> HashMap<GicsSector, usize> {
        let mut counts = HashMap::new();
        for sector in self.records().iter().filter_map(|r| r.sector) {
            *counts.entry(sector).or_insert(0) += 1;
        }
        counts
    }
}
