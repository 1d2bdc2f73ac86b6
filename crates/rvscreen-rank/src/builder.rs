//! Metric Table Builder
//!
//! Turns fetched provider records into one fixed-schema row per symbol, in
//! universe order. Symbols the provider did not return get an all-missing row
//! so they stay visible downstream.

use crate::metric::Metric;
use crate::row::MetricRow;
use rvscreen_data::{BatchMetrics, RawMetrics, SymbolRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What to do with the ticker of a symbol that has no provider record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickerPolicy {
    /// Keep the ticker so the row stays identifiable.
    #[default]
    Preserve,
    /// Blank the ticker along with every metric, matching the legacy report layout.
    Blank,
}

/// Divide two optional operands. Missing on either side, a zero denominator,
/// or a non-finite quotient all give `None`.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d).filter(|q| q.is_finite()),
        _ => None,
    }
}

/// Builds the initial metric table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricTableBuilder {
    ticker_policy: TickerPolicy,
}

impl MetricTableBuilder {
    /// Create a builder with the given ticker policy.
    pub const fn new(ticker_policy: TickerPolicy) -> Self {
        Self { ticker_policy }
    }

    /// Build a single row. `raw` is `None` when the provider had no record.
    pub fn build_row(&self, position: usize, ticker: &str, raw: Option<&RawMetrics>) -> MetricRow {
        let Some(raw) = raw else {
            debug!(ticker, "no provider data, emitting all-missing row");
            let ticker = match self.ticker_policy {
                TickerPolicy::Preserve => Some(ticker.to_string()),
                TickerPolicy::Blank => None,
            };
            return MetricRow::new(position, ticker, None);
        };

        MetricRow::new(position, Some(ticker.to_string()), raw.price)
            .with_value(Metric::PriceToEarnings, raw.pe_ratio)
            .with_value(Metric::PriceToBook, raw.price_to_book)
            .with_value(Metric::PriceToSales, raw.price_to_sales)
            .with_value(
                Metric::EvToEbitda,
                ratio(raw.enterprise_value, raw.ebitda),
            )
            .with_value(
                Metric::EvToGrossProfit,
                ratio(raw.enterprise_value, raw.gross_profit),
            )
            .with_value(Metric::Peg, raw.peg_ratio)
            .with_value(Metric::DebtToEquity, raw.debt_to_equity)
    }

    /// Build one row per symbol, in the order given.
    pub fn build(&self, symbols: &[SymbolRecord], fetched: &BatchMetrics) -> Vec<MetricRow> {
        symbols
            .iter()
            .enumerate()
            .map(|(position, symbol)| {
                self.build_row(position, &symbol.ticker, fetched.get(&symbol.ticker))
            })
            .collect()
    }
}
