#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rvscreen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod allocation;
pub mod error;
pub mod pipeline;
pub mod universe;

// Re-export member crates
pub use rvscreen_data as data;
pub use rvscreen_output as output;
pub use rvscreen_rank as rank;

pub use allocation::{Allocation, Budget, allocate, shares_for};
pub use error::{AllocationError, Result, ScreenError};
pub use pipeline::{ScreenConfig, ScreenEvent, Screener, Screening};
pub use universe::{StaticUniverse, Universe};

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
