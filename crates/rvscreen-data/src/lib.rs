#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rvscreen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod error;
pub mod gics;
pub mod iex;
pub mod metrics;
pub mod retry;
pub mod symbols;
pub mod wikipedia;

pub use batch::{BatchMetrics, MetricFetcher, chunk_tickers, fetch_all};
pub use config::ProviderConfig;
pub use error::{DataError, Result};
pub use gics::GicsSector;
pub use iex::IexBatchClient;
pub use metrics::RawMetrics;
pub use retry::{Backoff, RetryPolicy};
pub use symbols::{SymbolRecord, SymbolSource};
pub use wikipedia::WikipediaSymbolSource;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
