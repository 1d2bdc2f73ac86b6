//! Composite Ranker
//!
//! Averages the valuation percentiles of each symbol into a single RV
//! score, orders symbols from cheapest to most expensive and keeps the top N.

use crate::config::DEFAULT_TOP_N;
use crate::error::{RankError, Result};
use crate::metric::Metric;
use crate::percentile::ScoredTable;
use crate::row::MetricRow;
use tracing::info;

/// The final ranked selection, cheapest first, positions `0..len`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTable {
    rows: Vec<MetricRow>,
    scored_metrics: Vec<Metric>,
}

impl RankedTable {
    /// The selected rows, in rank order.
    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// Mutable access for later stages that fill in allocation columns.
    pub fn rows_mut(&mut self) -> &mut [MetricRow] {
        &mut self.rows
    }

    /// Consume the table.
    pub fn into_rows(self) -> Vec<MetricRow> {
        self.rows
    }

    /// Metrics whose percentiles formed the RV score.
    pub fn scored_metrics(&self) -> &[Metric] {
        &self.scored_metrics
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ranks a scored table by RV score.
#[derive(Debug, Clone, Copy)]
pub struct CompositeRanker {
    top_n: usize,
}

impl Default for CompositeRanker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl CompositeRanker {
    /// Create a ranker keeping at most `top_n` symbols.
    pub const fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Mean of the given percentiles of a row; `None` if none are present.
    pub fn rv_score(row: &MetricRow, metrics: &[Metric]) -> Option<f64> {
        let (sum, count) = metrics
            .iter()
            .filter_map(|&m| row.percentile(m))
            .fold((0.0, 0_usize), |(sum, count), p| (sum + p, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Score, sort ascending (stable, ties keep table order), truncate and re-index.
    ///
    /// Fewer rows than `top_n` is not an error; all rows are returned.
    ///
    /// # Errors
    ///
    /// [`RankError::NoScorableMetrics`] if every ranking column was skipped.
    pub fn rank(&self, table: ScoredTable) -> Result<RankedTable> {
        let (mut rows, skipped) = table.into_parts();
        let scored_metrics: Vec<Metric> = Metric::RANKING
            .into_iter()
            .filter(|m| !skipped.contains(m))
            .collect();
        if scored_metrics.is_empty() {
            return Err(RankError::NoScorableMetrics);
        }

        for row in &mut rows {
            row.rv_score = Self::rv_score(row, &scored_metrics);
        }

        let universe = rows.len();
        rows.sort_by(|a, b| {
            let key = |row: &MetricRow| row.rv_score.unwrap_or(f64::INFINITY);
            key(a).total_cmp(&key(b))
        });
        rows.truncate(self.top_n);
        for (position, row) in rows.iter_mut().enumerate() {
            row.position = position;
        }

        info!(universe, selected = rows.len(), "ranked by RV score");
        Ok(RankedTable {
            rows,
            scored_metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impute::{DegeneratePolicy, Imputer};
    use crate::percentile::PercentileScorer;
    use approx::assert_relative_eq;

    /// Rows where every metric equals `value`.
    fn uniform_rows(values: &[f64]) -> Vec<MetricRow> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut row = MetricRow::new(i, Some(format!("T{i}")), Some(10.0));
                for metric in Metric::ALL {
                    row = row.with_value(metric, Some(v));
                }
                row
            })
            .collect()
    }

    fn scored(rows: Vec<MetricRow>) -> ScoredTable {
        PercentileScorer::new().score(Imputer::default().impute(rows).unwrap())
    }

    #[test]
    fn test_rank_sorts_ascending_and_reindexes() {
        let ranked = CompositeRanker::new(25)
            .rank(scored(uniform_rows(&[3.0, 1.0, 2.0])))
            .unwrap();
        let tickers: Vec<_> = ranked.rows().iter().map(|r| r.display_name()).collect();
        assert_eq!(tickers, vec!["T1", "T2", "T0"]);
        let positions: Vec<_> = ranked.rows().iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let ranked = CompositeRanker::new(2)
            .rank(scored(uniform_rows(&[5.0, 4.0, 3.0, 2.0, 1.0])))
            .unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked.rows()[0].display_name(), "T4");
        assert_eq!(ranked.rows()[1].display_name(), "T3");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = CompositeRanker::new(10)
            .rank(scored(uniform_rows(&[1.0, 1.0, 1.0])))
            .unwrap();
        let tickers: Vec<_> = ranked.rows().iter().map(|r| r.display_name()).collect();
        assert_eq!(tickers, vec!["T0", "T1", "T2"]);
    }

    #[test]
    fn test_debt_to_equity_excluded_from_score() {
        let rows: Vec<MetricRow> = uniform_rows(&[1.0, 2.0])
            .into_iter()
            .enumerate()
            // Reverse the D/E ordering; it must not change the result.
            .map(|(i, r)| r.with_value(Metric::DebtToEquity, Some(10.0 - i as f64)))
            .collect();
        let ranked = CompositeRanker::default().rank(scored(rows)).unwrap();
        let first = &ranked.rows()[0];
        assert_eq!(first.display_name(), "T0");
        assert_relative_eq!(first.rv_score.unwrap(), 50.0);
        assert_relative_eq!(first.percentile(Metric::DebtToEquity).unwrap(), 100.0);
        assert_eq!(ranked.scored_metrics(), &Metric::RANKING);
    }

    #[test]
    fn test_skipped_column_excluded() {
        let rows: Vec<MetricRow> = uniform_rows(&[1.0, 2.0])
            .into_iter()
            .map(|r| r.with_value(Metric::Peg, None))
            .collect();
        let table = PercentileScorer::new().score(
            Imputer::new(DegeneratePolicy::SkipColumn)
                .impute(rows)
                .unwrap(),
        );
        let ranked = CompositeRanker::default().rank(table).unwrap();
        assert_eq!(ranked.scored_metrics().len(), 5);
        assert!(!ranked.scored_metrics().contains(&Metric::Peg));
        assert_relative_eq!(ranked.rows()[0].rv_score.unwrap(), 50.0);
    }

    #[test]
    fn test_no_scorable_metrics() {
        let rows: Vec<MetricRow> = (0..2)
            .map(|i| MetricRow::new(i, Some(format!("T{i}")), Some(1.0)))
            .collect();
        let table = PercentileScorer::new().score(
            Imputer::new(DegeneratePolicy::SkipColumn)
                .impute(rows)
                .unwrap(),
        );
        assert_eq!(
            CompositeRanker::default().rank(table),
            Err(RankError::NoScorableMetrics)
        );
    }
}
