#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rvscreen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod composite;
pub mod config;
pub mod error;
pub mod impute;
pub mod metric;
pub mod percentile;
pub mod row;

pub use builder::{MetricTableBuilder, TickerPolicy, ratio};
pub use composite::{CompositeRanker, RankedTable};
pub use config::{DEFAULT_TOP_N, RankConfig};
pub use error::{RankError, Result};
pub use impute::{DegeneratePolicy, ImputedTable, Imputer};
pub use metric::{Metric, MetricInfo, metric_registry};
pub use percentile::{PercentileScorer, ScoredTable, percentile_of_score};
pub use row::{MetricCell, MetricRow};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
