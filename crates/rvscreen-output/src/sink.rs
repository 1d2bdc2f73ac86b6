//! Report destinations.

use crate::export::{ExportError, ExportFormat, Exporter, ReportTable};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default report file name.
pub const DEFAULT_REPORT_PATH: &str = "ValueStocks.csv";

/// Receives the final ranked selection.
pub trait ReportSink {
    /// Write the table.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the destination cannot be written.
    fn write(&self, table: &ReportTable) -> Result<(), ExportError>;
}

/// Writes the report to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    path: PathBuf,
    format: ExportFormat,
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_PATH, ExportFormat::Csv)
    }
}

impl FileSink {
    /// Create a sink with an explicit format.
    pub fn new(path: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Create a sink whose format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidFormat`] for an unknown extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let path = path.into();
        let format = ExportFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output format.
    pub const fn format(&self) -> ExportFormat {
        self.format
    }
}

impl ReportSink for FileSink {
    fn write(&self, table: &ReportTable) -> Result<(), ExportError> {
        table.export_to_file(&self.path, self.format)?;
        info!(path = %self.path.display(), rows = table.len(), format = self.format.extension(), "report written");
        Ok(())
    }
}
