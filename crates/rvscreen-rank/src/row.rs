//! Fixed-schema metric rows.

use crate::metric::Metric;
use serde::{Deserialize, Serialize};

/// A metric value and its percentile within the column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricCell {
    /// Raw (or imputed) value; `None` when missing.
    pub value: Option<f64>,
    /// Percentile rank, 0-100; `None` until scored.
    pub percentile: Option<f64>,
}

/// One symbol's row in the screening table.
///
/// Every row carries the same columns regardless of data availability;
/// missing values are `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    /// Dense 0-based position within the current table.
    pub position: usize,
    /// Ticker, `None` only when blanked for a symbol with no data.
    pub ticker: Option<String>,
    /// Latest price.
    pub price: Option<f64>,
    /// Whole shares to buy, set by the allocator.
    pub shares_to_buy: Option<u64>,
    cells: [MetricCell; Metric::COUNT],
    /// Composite relative-value score, set by the ranker.
    pub rv_score: Option<f64>,
}

impl MetricRow {
    /// A row with every metric missing.
    pub fn new(position: usize, ticker: Option<String>, price: Option<f64>) -> Self {
        Self {
            position,
            ticker,
            price,
            shares_to_buy: None,
            cells: [MetricCell::default(); Metric::COUNT],
            rv_score: None,
        }
    }

    /// Set a metric value, builder style.
    pub const fn with_value(mut self, metric: Metric, value: Option<f64>) -> Self {
        self.cells[metric.index()].value = value;
        self
    }

    /// The cell for a metric.
    pub const fn cell(&self, metric: Metric) -> MetricCell {
        self.cells[metric.index()]
    }

    /// The metric value, if present.
    pub const fn value(&self, metric: Metric) -> Option<f64> {
        self.cells[metric.index()].value
    }

    /// The metric percentile, if scored.
    pub const fn percentile(&self, metric: Metric) -> Option<f64> {
        self.cells[metric.index()].percentile
    }

    pub(crate) const fn set_value(&mut self, metric: Metric, value: f64) {
        self.cells[metric.index()].value = Some(value);
    }

    pub(crate) const fn set_percentile(&mut self, metric: Metric, percentile: f64) {
        self.cells[metric.index()].percentile = Some(percentile);
    }

    /// Label for logs and messages: the ticker, or `#position` when blank.
    pub fn display_name(&self) -> String {
        self.ticker
            .clone()
            .unwrap_or_else(|| format!("#{}", self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_row_all_missing() {
        let row = MetricRow::new(3, Some("AAA".to_string()), None);
        for metric in Metric::ALL {
            assert_eq!(row.cell(metric), MetricCell::default());
        }
        assert_eq!(row.rv_score, None);
        assert_eq!(row.shares_to_buy, None);
    }

    #[test]
    fn test_with_value() {
        let row = MetricRow::new(0, None, Some(5.0)).with_value(Metric::Peg, Some(1.2));
        assert_eq!(row.value(Metric::Peg), Some(1.2));
        assert_eq!(row.percentile(Metric::Peg), None);
        assert_eq!(row.display_name(), "#0");
    }
}
