//! Terminal rendering of a run.

use crate::export::{ExportError, ReportTable};
use crate::report::AllocationSummary;
use polars::prelude::*;
use rvscreen_rank::Metric;
use serde::{Deserialize, Serialize};
use std::fmt;

const WIDTH: usize = 112;

fn cell(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

impl ReportTable {
    /// Render the selection as a fixed-width table, cheapest first.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nRelative Value Selection: {} stocks\n", self.len()));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        output.push_str(&format!(
            "{:>4} {:<8} {:>10} {:>8} {:>8} {:>8} {:>8} {:>10} {:>8} {:>8} {:>8} {:>10}\n",
            "#", "Ticker", "Price", "Shares", "P/E", "P/B", "P/S", "EV/EBITDA", "EV/GP", "PEG",
            "D/E", "RV Score"
        ));
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');

        for (rank, row) in self.rows().iter().enumerate() {
            let metric = |m| cell(row.metric(m).0, 2);
            output.push_str(&format!(
                "{:>4} {:<8} {:>10} {:>8} {:>8} {:>8} {:>8} {:>10} {:>8} {:>8} {:>8} {:>10}\n",
                rank + 1,
                row.ticker.as_deref().unwrap_or("-"),
                cell(row.price, 2),
                row.shares_to_buy
                    .map_or_else(|| "-".to_string(), |s| s.to_string()),
                metric(Metric::PriceToEarnings),
                metric(Metric::PriceToBook),
                metric(Metric::PriceToSales),
                metric(Metric::EvToEbitda),
                metric(Metric::EvToGrossProfit),
                metric(Metric::Peg),
                metric(Metric::DebtToEquity),
                cell(row.rv_score, 2),
            ));
        }

        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');
        output
    }
}

/// Distribution of one numeric report column across the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Report header.
    pub column: String,
    /// Mean of present values.
    pub mean: Option<f64>,
    /// Smallest present value.
    pub min: Option<f64>,
    /// Largest present value.
    pub max: Option<f64>,
    /// Rows without a value.
    pub missing: usize,
}

impl ReportTable {
    /// Mean, range and gap count of each metric column and the RV score,
    /// computed over the DataFrame view.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Frame`] if a column is missing or not numeric.
    pub fn column_stats(&self) -> Result<Vec<ColumnStats>, ExportError> {
        let df = self.to_dataframe()?;
        let labels = Metric::ALL
            .iter()
            .map(|m| m.label())
            .chain(std::iter::once("RV Score"));

        let mut stats = Vec::with_capacity(Metric::COUNT + 1);
        for label in labels {
            let values = df.column(label)?.as_materialized_series().f64()?;
            stats.push(ColumnStats {
                column: label.to_string(),
                mean: values.mean(),
                min: values.min(),
                max: values.max(),
                missing: values.null_count(),
            });
        }
        Ok(stats)
    }
}

/// Render column statistics as a fixed-width table.
pub fn stats_table(stats: &[ColumnStats]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<12} {:>12} {:>12} {:>12} {:>8}\n",
        "Column", "Mean", "Min", "Max", "Missing"
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for s in stats {
        output.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>12} {:>8}\n",
            s.column.trim_end_matches(" Ratio"),
            cell(s.mean, 2),
            cell(s.min, 2),
            cell(s.max, 2),
            s.missing
        ));
    }
    output
}

impl fmt::Display for AllocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Portfolio Size:    {:>14.2}", self.budget)?;
        writeln!(f, "Position Size:     {:>14.2}", self.position_size)?;
        writeln!(f, "Total Spent:       {:>14.2}", self.total_spent)?;
        write!(f, "Cash Remaining:    {:>14.2}", self.cash_remaining)?;
        if !self.unpriced.is_empty() {
            write!(f, "\nNo price (shares undefined): {}", self.unpriced.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvscreen_rank::MetricRow;

    #[test]
    fn test_ascii_table() {
        let mut priced = MetricRow::new(0, Some("AAA".to_string()), Some(12.345))
            .with_value(Metric::PriceToEarnings, Some(8.0));
        priced.shares_to_buy = Some(3);
        priced.rv_score = Some(17.25);
        let blank = MetricRow::new(1, None, None);

        let table = ReportTable::from_rows(&[priced, blank]);
        let ascii = table.to_ascii_table();

        assert!(ascii.contains("Relative Value Selection: 2 stocks"));
        assert!(ascii.contains("AAA"));
        assert!(ascii.contains("12.35") || ascii.contains("12.34"));
        assert!(ascii.contains("17.25"));
        let last_row = ascii.lines().rev().nth(1).unwrap();
        assert!(last_row.trim_start().starts_with("2 -"));
    }

    #[test]
    fn test_column_stats() {
        let rows: Vec<MetricRow> = [(Some(10.0), Some(20.0)), (Some(30.0), Some(40.0)), (None, None)]
            .into_iter()
            .enumerate()
            .map(|(i, (pe, rv))| {
                let mut row = MetricRow::new(i, Some(format!("T{i}")), Some(1.0))
                    .with_value(Metric::PriceToEarnings, pe);
                row.rv_score = rv;
                row
            })
            .collect();

        let stats = ReportTable::from_rows(&rows).column_stats().unwrap();
        assert_eq!(stats.len(), Metric::COUNT + 1);

        let pe = &stats[0];
        assert_eq!(pe.column, "P/E Ratio");
        assert_eq!(pe.mean, Some(20.0));
        assert_eq!(pe.min, Some(10.0));
        assert_eq!(pe.max, Some(30.0));
        assert_eq!(pe.missing, 1);

        let pb = &stats[1];
        assert_eq!(pb.mean, None);
        assert_eq!(pb.missing, 3);

        let rv = stats.last().unwrap();
        assert_eq!(rv.column, "RV Score");
        assert_eq!(rv.mean, Some(30.0));

        let rendered = stats_table(&stats);
        assert!(rendered.lines().any(|l| l.starts_with("P/E ") && l.contains("20.00")));
        assert!(rendered.lines().any(|l| l.starts_with("RV Score")));
    }

    #[test]
    fn test_column_stats_empty_table() {
        let stats = ReportTable::default().column_stats().unwrap();
        assert!(stats.iter().all(|s| s.mean.is_none() && s.missing == 0));
    }

    #[test]
    fn test_allocation_display() {
        let summary = AllocationSummary {
            budget: 1000.0,
            position_size: 500.0,
            total_spent: 900.0,
            cash_remaining: 100.0,
            unpriced: vec!["ZZZ".to_string()],
        };
        let text = summary.to_string();
        assert!(text.contains("1000.00"));
        assert!(text.contains("900.00"));
        assert!(text.ends_with("No price (shares undefined): ZZZ"));
    }
}
