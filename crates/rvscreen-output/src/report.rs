//! Run reports.

use crate::export::{ExportError, ExportFormat, Exporter, ReportTable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the budget was spread over the selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Total budget.
    pub budget: f64,
    /// Budget per selected row.
    pub position_size: f64,
    /// Amount spent on whole shares.
    pub total_spent: f64,
    /// Budget left over.
    pub cash_remaining: f64,
    /// Symbols without a usable price.
    pub unpriced: Vec<String>,
}

/// A complete record of one screening run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Symbols in the screened universe.
    pub universe_size: usize,

    /// Requested selection size.
    pub top_n: usize,

    /// Symbols the provider returned nothing for.
    pub missing: Vec<String>,

    /// Metrics that entered the RV score.
    pub scored_metrics: Vec<String>,

    /// Allocation outcome, when a budget was applied.
    pub allocation: Option<AllocationSummary>,

    /// Final selection.
    pub rows: ReportTable,
}

impl RunReport {
    /// Convert report to JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Exporter for RunReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => Err(ExportError::InvalidFormat(
                "run reports are JSON only".to_string(),
            )),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => self.to_json(),
        }
    }
}

/// Builder for creating run reports.
#[derive(Debug, Default)]
pub struct RunReportBuilder {
    universe_size: usize,
    top_n: usize,
    missing: Vec<String>,
    scored_metrics: Vec<String>,
    allocation: Option<AllocationSummary>,
    rows: ReportTable,
}

impl RunReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the universe size.
    pub const fn universe_size(mut self, size: usize) -> Self {
        self.universe_size = size;
        self
    }

    /// Set the requested selection size.
    pub const fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the symbols without data.
    pub fn missing(mut self, missing: Vec<String>) -> Self {
        self.missing = missing;
        self
    }

    /// Set the metrics that entered the RV score.
    pub fn scored_metrics(mut self, metrics: Vec<String>) -> Self {
        self.scored_metrics = metrics;
        self
    }

    /// Set the allocation summary.
    pub fn allocation(mut self, allocation: AllocationSummary) -> Self {
        self.allocation = Some(allocation);
        self
    }

    /// Set the selection.
    pub fn rows(mut self, rows: ReportTable) -> Self {
        self.rows = rows;
        self
    }

    /// Build the report, stamped with the current time.
    pub fn build(self) -> RunReport {
        RunReport {
            generated_at: Utc::now(),
            universe_size: self.universe_size,
            top_n: self.top_n,
            missing: self.missing,
            scored_metrics: self.scored_metrics,
            allocation: self.allocation,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvscreen_rank::MetricRow;

    #[test]
    fn test_report_builder() {
        let rows = vec![MetricRow::new(0, Some("AAA".to_string()), Some(10.0))];
        let report = RunReportBuilder::new()
            .universe_size(500)
            .top_n(25)
            .missing(vec!["ZZZ".to_string()])
            .scored_metrics(vec!["P/E".to_string()])
            .allocation(AllocationSummary {
                budget: 1000.0,
                position_size: 1000.0,
                total_spent: 1000.0,
                cash_remaining: 0.0,
                unpriced: Vec::new(),
            })
            .rows(ReportTable::from_rows(&rows))
            .build();

        assert_eq!(report.universe_size, 500);
        assert_eq!(report.rows.len(), 1);

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["top_n"], 25);
        assert_eq!(value["missing"][0], "ZZZ");
        assert_eq!(value["rows"][0]["Ticker"], "AAA");
        assert_eq!(value["allocation"]["budget"], 1000.0);
    }

    #[test]
    fn test_run_report_rejects_csv() {
        let report = RunReportBuilder::new().build();
        assert!(matches!(
            report.export_to_string(ExportFormat::Csv),
            Err(ExportError::InvalidFormat(_))
        ));
        assert!(report.allocation.is_none());
    }
}
