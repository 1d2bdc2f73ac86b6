//! Export of the ranked selection.
//!
//! Every report carries the same eighteen columns in a fixed order, whatever
//! data was available. Missing values are empty CSV cells or JSON `null`.

use polars::prelude::*;
use rvscreen_rank::{Metric, MetricRow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// DataFrame construction error.
    #[error("DataFrame error: {0}")]
    Frame(#[from] PolarsError),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Infer the format from a file extension; `.json` maps to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidFormat`] for a missing or unknown extension.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::PrettyJson),
            _ => Err(ExportError::InvalidFormat(format!(
                "cannot infer report format from {}",
                path.display()
            ))),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Report column headers, in output order.
pub const COLUMNS: [&str; 18] = [
    "Ticker",
    "Price",
    "Number of Shares to Buy",
    "P/E Ratio",
    "P/E Percentile",
    "P/B Ratio",
    "P/B Percentile",
    "P/S Ratio",
    "P/S Percentile",
    "EV/EBITDA",
    "EV/EBITDA Percentile",
    "EV/GP",
    "EV/GP Percentile",
    "PEG Ratio",
    "PEG Percentile",
    "D/E Ratio",
    "D/E Percentile",
    "RV Score",
];

/// One report line. Field order matches [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Ticker, blank when withheld.
    #[serde(rename = "Ticker")]
    pub ticker: Option<String>,
    /// Latest price.
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    /// Whole shares to buy.
    #[serde(rename = "Number of Shares to Buy")]
    pub shares_to_buy: Option<u64>,
    /// Price / earnings.
    #[serde(rename = "P/E Ratio")]
    pub pe_ratio: Option<f64>,
    /// P/E percentile.
    #[serde(rename = "P/E Percentile")]
    pub pe_percentile: Option<f64>,
    /// Price / book.
    #[serde(rename = "P/B Ratio")]
    pub pb_ratio: Option<f64>,
    /// P/B percentile.
    #[serde(rename = "P/B Percentile")]
    pub pb_percentile: Option<f64>,
    /// Price / sales.
    #[serde(rename = "P/S Ratio")]
    pub ps_ratio: Option<f64>,
    /// P/S percentile.
    #[serde(rename = "P/S Percentile")]
    pub ps_percentile: Option<f64>,
    /// Enterprise value / EBITDA.
    #[serde(rename = "EV/EBITDA")]
    pub ev_ebitda: Option<f64>,
    /// EV/EBITDA percentile.
    #[serde(rename = "EV/EBITDA Percentile")]
    pub ev_ebitda_percentile: Option<f64>,
    /// Enterprise value / gross profit.
    #[serde(rename = "EV/GP")]
    pub ev_gp: Option<f64>,
    /// EV/GP percentile.
    #[serde(rename = "EV/GP Percentile")]
    pub ev_gp_percentile: Option<f64>,
    /// PEG ratio.
    #[serde(rename = "PEG Ratio")]
    pub peg_ratio: Option<f64>,
    /// PEG percentile.
    #[serde(rename = "PEG Percentile")]
    pub peg_percentile: Option<f64>,
    /// Debt / equity.
    #[serde(rename = "D/E Ratio")]
    pub de_ratio: Option<f64>,
    /// D/E percentile.
    #[serde(rename = "D/E Percentile")]
    pub de_percentile: Option<f64>,
    /// Composite relative-value score.
    #[serde(rename = "RV Score")]
    pub rv_score: Option<f64>,
}

impl From<&MetricRow> for ReportRow {
    fn from(row: &MetricRow) -> Self {
        let v = |m| row.value(m);
        let p = |m| row.percentile(m);
        Self {
            ticker: row.ticker.clone(),
            price: row.price,
            shares_to_buy: row.shares_to_buy,
            pe_ratio: v(Metric::PriceToEarnings),
            pe_percentile: p(Metric::PriceToEarnings),
            pb_ratio: v(Metric::PriceToBook),
            pb_percentile: p(Metric::PriceToBook),
            ps_ratio: v(Metric::PriceToSales),
            ps_percentile: p(Metric::PriceToSales),
            ev_ebitda: v(Metric::EvToEbitda),
            ev_ebitda_percentile: p(Metric::EvToEbitda),
            ev_gp: v(Metric::EvToGrossProfit),
            ev_gp_percentile: p(Metric::EvToGrossProfit),
            peg_ratio: v(Metric::Peg),
            peg_percentile: p(Metric::Peg),
            de_ratio: v(Metric::DebtToEquity),
            de_percentile: p(Metric::DebtToEquity),
            rv_score: row.rv_score,
        }
    }
}

impl ReportRow {
    /// Value and percentile of a metric.
    pub const fn metric(&self, metric: Metric) -> (Option<f64>, Option<f64>) {
        match metric {
            Metric::PriceToEarnings => (self.pe_ratio, self.pe_percentile),
            Metric::PriceToBook => (self.pb_ratio, self.pb_percentile),
            Metric::PriceToSales => (self.ps_ratio, self.ps_percentile),
            Metric::EvToEbitda => (self.ev_ebitda, self.ev_ebitda_percentile),
            Metric::EvToGrossProfit => (self.ev_gp, self.ev_gp_percentile),
            Metric::Peg => (self.peg_ratio, self.peg_percentile),
            Metric::DebtToEquity => (self.de_ratio, self.de_percentile),
        }
    }
}

/// The ranked selection as report rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Build a table from metric rows, keeping their order.
    pub fn from_rows(rows: &[MetricRow]) -> Self {
        Self {
            rows: rows.iter().map(ReportRow::from).collect(),
        }
    }

    /// Rows in rank order.
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows as a DataFrame with one column per report header.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Frame`] if the frame cannot be assembled.
    pub fn to_dataframe(&self) -> Result<DataFrame, ExportError> {
        let tickers: Vec<Option<String>> = self.rows.iter().map(|r| r.ticker.clone()).collect();
        let prices: Vec<Option<f64>> = self.rows.iter().map(|r| r.price).collect();
        let shares: Vec<Option<u64>> = self.rows.iter().map(|r| r.shares_to_buy).collect();

        let mut columns: Vec<Column> = vec![
            Series::new(COLUMNS[0].into(), tickers).into(),
            Series::new(COLUMNS[1].into(), prices).into(),
            Series::new(COLUMNS[2].into(), shares).into(),
        ];

        for metric in Metric::ALL {
            let values: Vec<Option<f64>> = self.rows.iter().map(|r| r.metric(metric).0).collect();
            let percentiles: Vec<Option<f64>> =
                self.rows.iter().map(|r| r.metric(metric).1).collect();
            columns.push(Series::new(metric.label().into(), values).into());
            columns.push(Series::new(metric.percentile_label().into(), percentiles).into());
        }

        let scores: Vec<Option<f64>> = self.rows.iter().map(|r| r.rv_score).collect();
        columns.push(Series::new(COLUMNS[17].into(), scores).into());

        Ok(DataFrame::new(columns)?)
    }

    fn to_csv(&self) -> Result<String, ExportError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        // Written by hand so an empty table still gets a header line.
        wtr.write_record(COLUMNS)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// The content is fully rendered before the file is created, so a
    /// serialization failure leaves no file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl Exporter for ReportTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
