//! Mean imputation of missing metric values.

use crate::error::{RankError, Result};
use crate::metric::Metric;
use crate::row::MetricRow;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do when a ranking column has no values at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Abort the run with [`RankError::DegenerateColumn`].
    #[default]
    Fail,
    /// Leave the column missing and exclude it from the RV score.
    SkipColumn,
}

/// A metric table whose scored columns are fully populated.
///
/// Only [`Imputer::impute`] constructs this; every metric not listed in
/// [`ImputedTable::skipped`] has a value in every row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedTable {
    rows: Vec<MetricRow>,
    skipped: Vec<Metric>,
}

impl ImputedTable {
    /// The rows.
    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// Columns left missing because they had no values.
    pub fn skipped(&self) -> &[Metric] {
        &self.skipped
    }

    pub(crate) fn into_parts(self) -> (Vec<MetricRow>, Vec<Metric>) {
        (self.rows, self.skipped)
    }
}

/// Fills missing metric values with the column mean.
///
/// Price and ticker are never imputed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Imputer {
    policy: DegeneratePolicy,
}

impl Imputer {
    /// Create an imputer with the given degenerate-column policy.
    pub const fn new(policy: DegeneratePolicy) -> Self {
        Self { policy }
    }

    /// Mean of the present values in a column, `None` if there are none.
    pub fn column_mean(rows: &[MetricRow], metric: Metric) -> Option<f64> {
        let (sum, count) = rows
            .iter()
            .filter_map(|row| row.value(metric))
            .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Impute every tracked metric column independently.
    ///
    /// An empty debt-to-equity column is always left missing since it does
    /// not enter the RV score.
    ///
    /// # Errors
    ///
    /// [`RankError::EmptyTable`] for no rows; [`RankError::DegenerateColumn`]
    /// for an empty ranking column under [`DegeneratePolicy::Fail`].
    pub fn impute(&self, mut rows: Vec<MetricRow>) -> Result<ImputedTable> {
        if rows.is_empty() {
            return Err(RankError::EmptyTable);
        }

        let mut skipped = Vec::new();
        for metric in Metric::ALL {
            let Some(mean) = Self::column_mean(&rows, metric) else {
                if metric.in_rv_score() && self.policy == DegeneratePolicy::Fail {
                    return Err(RankError::DegenerateColumn { metric });
                }
                warn!(%metric, "no values in column, leaving it missing");
                skipped.push(metric);
                continue;
            };

            let mut filled = 0_usize;
            for row in rows.iter_mut().filter(|row| row.value(metric).is_none()) {
                row.set_value(metric, mean);
                filled += 1;
            }
            debug!(%metric, mean, filled, "imputed column");
        }

        Ok(ImputedTable { rows, skipped })
    }
}
