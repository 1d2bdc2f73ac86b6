//! Decoding of the batch response body.
//!
//! The provider returns an object keyed by ticker:
//! `{"AAPL": {"price": 189.2, "quote": {"peRatio": 29.1}, "advanced-stats": {...}}}`.
//! Sections and fields may be missing or `null`; tickers the provider does
//! not know are omitted.

use crate::batch::BatchMetrics;
use crate::error::{DataError, Result};
use crate::metrics::RawMetrics;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct BatchEntry {
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    quote: Option<QuoteSection>,
    #[serde(default, rename = "advanced-stats")]
    advanced_stats: Option<AdvancedStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSection {
    #[serde(default)]
    pe_ratio: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvancedStats {
    #[serde(default)]
    price_to_book: Option<f64>,
    #[serde(default)]
    price_to_sales: Option<f64>,
    #[serde(default)]
    enterprise_value: Option<f64>,
    #[serde(default, rename = "EBITDA")]
    ebitda: Option<f64>,
    #[serde(default)]
    gross_profit: Option<f64>,
    #[serde(default)]
    peg_ratio: Option<f64>,
    #[serde(default)]
    debt_to_equity: Option<f64>,
}

impl From<BatchEntry> for RawMetrics {
    fn from(entry: BatchEntry) -> Self {
        let quote = entry.quote.unwrap_or_default();
        let stats = entry.advanced_stats.unwrap_or_default();
        Self {
            price: entry.price,
            pe_ratio: quote.pe_ratio,
            price_to_book: stats.price_to_book,
            price_to_sales: stats.price_to_sales,
            enterprise_value: stats.enterprise_value,
            ebitda: stats.ebitda,
            gross_profit: stats.gross_profit,
            peg_ratio: stats.peg_ratio,
            debt_to_equity: stats.debt_to_equity,
        }
    }
}

/// Decode a batch response body into per-ticker metrics.
///
/// A ticker mapped to `null` is treated the same as an omitted ticker. So is
/// a ticker whose entry cannot be decoded; the rest of the batch is kept.
///
/// # Errors
///
/// Returns [`DataError::Parse`] if the body is not a ticker-keyed object.
pub fn parse_batch(body: &str) -> Result<BatchMetrics> {
    let entries: HashMap<String, Value> = serde_json::from_str(body)
        .map_err(|e| DataError::Parse(format!("invalid batch response: {e}")))?;

    let mut metrics = BatchMetrics::with_capacity(entries.len());
    for (ticker, value) in entries {
        match serde_json::from_value::<Option<BatchEntry>>(value) {
            Ok(Some(entry)) => {
                metrics.insert(ticker, RawMetrics::from(entry));
            }
            Ok(None) => {}
            Err(err) => warn!(%ticker, error = %err, "undecodable batch entry, treating symbol as absent"),
        }
    }
    Ok(metrics)
}
