//! IEX Cloud batch market data.
//!
//! A single request covers up to [`crate::config::DEFAULT_BATCH_SIZE`] symbols and
//! the `price`, `quote` and `advanced-stats` endpoints.

pub mod client;
pub mod response;

pub use client::IexBatchClient;
pub use response::parse_batch;
