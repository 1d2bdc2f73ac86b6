#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rvscreen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod sink;
pub mod summary;

pub use export::{COLUMNS, ExportError, ExportFormat, Exporter, ReportRow, ReportTable};
pub use report::{AllocationSummary, RunReport, RunReportBuilder};
pub use sink::{DEFAULT_REPORT_PATH, FileSink, ReportSink};
pub use summary::{ColumnStats, stats_table};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
