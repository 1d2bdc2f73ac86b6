//! Percentile Scorer
//!
//! Ranks every symbol within each metric column using the weak
//! percentile-of-score: the share of values in the column that are less
//! than or equal to the symbol's value, times 100. Tied values all receive
//! the percentile of the highest rank in the tie.

use crate::impute::ImputedTable;
use crate::metric::Metric;
use crate::row::MetricRow;

/// Weak percentile of `score` within `sorted`, which must be sorted ascending.
///
/// Returns 0 for an empty slice.
pub fn percentile_of_score(sorted: &[f64], score: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let at_or_below = sorted.partition_point(|&v| v <= score);
    at_or_below as f64 / sorted.len() as f64 * 100.0
}

/// A table with percentiles populated for every non-skipped metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTable {
    rows: Vec<MetricRow>,
    skipped: Vec<Metric>,
}

impl ScoredTable {
    /// The rows.
    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// Metrics without values, hence without percentiles.
    pub fn skipped(&self) -> &[Metric] {
        &self.skipped
    }

    pub(crate) fn into_parts(self) -> (Vec<MetricRow>, Vec<Metric>) {
        (self.rows, self.skipped)
    }
}

/// Computes per-column percentiles on an imputed table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileScorer;

impl PercentileScorer {
    /// Create a scorer.
    pub const fn new() -> Self {
        Self
    }

    /// Populate the percentile of every metric that has values.
    pub fn score(&self, table: ImputedTable) -> ScoredTable {
        let (mut rows, skipped) = table.into_parts();

        for metric in Metric::ALL.into_iter().filter(|m| !skipped.contains(m)) {
            let mut column: Vec<f64> = rows.iter().filter_map(|r| r.value(metric)).collect();
            column.sort_by(f64::total_cmp);

            for row in &mut rows {
                if let Some(value) = row.value(metric) {
                    row.set_percentile(metric, percentile_of_score(&column, value));
                }
            }
        }

        ScoredTable { rows, skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impute::Imputer;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[1.0, 2.0, 3.0, 4.0], 1.0, 25.0)]
    #[case(&[1.0, 2.0, 3.0, 4.0], 4.0, 100.0)]
    #[case(&[1.0, 2.0, 3.0, 4.0], 0.5, 0.0)]
    #[case(&[1.0, 2.0, 2.0, 4.0], 2.0, 75.0)]
    #[case(&[3.0, 3.0, 3.0], 3.0, 100.0)]
    #[case(&[], 3.0, 0.0)]
    fn test_percentile_of_score(#[case] sorted: &[f64], #[case] score: f64, #[case] expected: f64) {
        assert_relative_eq!(percentile_of_score(sorted, score), expected);
    }

    fn table(pe: &[f64]) -> ImputedTable {
        let rows = pe
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut row = MetricRow::new(i, Some(format!("T{i}")), Some(1.0));
                for metric in Metric::ALL {
                    row = row.with_value(metric, Some(1.0));
                }
                row.with_value(Metric::PriceToEarnings, Some(v))
            })
            .collect();
        Imputer::default().impute(rows).unwrap()
    }

    #[test]
    fn test_lower_value_lower_percentile() {
        let scored = PercentileScorer::new().score(table(&[30.0, 10.0, 20.0]));
        let pct: Vec<f64> = scored
            .rows()
            .iter()
            .map(|r| r.percentile(Metric::PriceToEarnings).unwrap())
            .collect();
        assert_relative_eq!(pct[1], 100.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(pct[2], 200.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(pct[0], 100.0);
    }

    #[test]
    fn test_identical_column_scores_100() {
        let scored = PercentileScorer::new().score(table(&[5.0, 5.0]));
        for row in scored.rows() {
            assert_relative_eq!(row.percentile(Metric::PriceToBook).unwrap(), 100.0);
        }
    }

    #[test]
    fn test_monotonic() {
        let values = [4.0, -2.0, 9.5, 4.0, 0.0, 13.0, 7.25];
        let scored = PercentileScorer::new().score(table(&values));
        let rows = scored.rows();
        for a in rows {
            for b in rows {
                let (va, vb) = (
                    a.value(Metric::PriceToEarnings).unwrap(),
                    b.value(Metric::PriceToEarnings).unwrap(),
                );
                if va <= vb {
                    assert!(
                        a.percentile(Metric::PriceToEarnings).unwrap()
                            <= b.percentile(Metric::PriceToEarnings).unwrap()
                    );
                }
            }
        }
    }
}
