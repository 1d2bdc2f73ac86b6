//! Batched metric fetching.
//!
//! The universe is split into provider-sized batches that are fetched with
//! bounded concurrency. Batches complete in any order but are merged in
//! submission order, so downstream stages see the same result for the same input.

use crate::error::{DataError, Result};
use crate::metrics::RawMetrics;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

/// Metrics for one or more batches, keyed by ticker. A ticker without an
/// entry had no data at the provider.
pub type BatchMetrics = HashMap<String, RawMetrics>;

/// Fetches raw metrics for a batch of tickers.
///
/// Per-symbol absence is a normal outcome and is expressed by leaving the
/// ticker out of the returned map; an `Err` means the whole batch failed.
pub trait MetricFetcher {
    /// Fetch metrics for every ticker in `tickers` in a single provider call.
    fn fetch_batch(&self, tickers: &[String]) -> impl Future<Output = Result<BatchMetrics>> + Send;
}

/// Split tickers into consecutive groups of at most `size`, preserving order.
/// A zero size is treated as one.
pub fn chunk_tickers(tickers: &[String], size: usize) -> Vec<Vec<String>> {
    tickers.chunks(size.max(1)).map(<[String]>::to_vec).collect()
}

/// Fetch metrics for all tickers in batches of `batch_size`, running up to
/// `concurrency` batches at once.
///
/// `on_batch` is called with the number of symbols in each completed batch,
/// in submission order.
///
/// # Errors
///
/// Returns [`DataError::Config`] for a zero batch size, or the first batch
/// failure; no partial result is returned.
pub async fn fetch_all<F, P>(
    fetcher: &F,
    tickers: &[String],
    batch_size: usize,
    concurrency: usize,
    mut on_batch: P,
) -> Result<BatchMetrics>
where
    F: MetricFetcher + Sync,
    P: FnMut(usize),
{
    if batch_size == 0 {
        return Err(DataError::Config("batch size must be at least 1".to_string()));
    }

    let batches = chunk_tickers(tickers, batch_size);
    let total = batches.len();
    let mut merged = BatchMetrics::with_capacity(tickers.len());

    let mut results = stream::iter(batches.into_iter().enumerate())
        .map(move |(index, batch)| async move {
            debug!(batch = index + 1, total, symbols = batch.len(), "fetching metric batch");
            let metrics = fetcher.fetch_batch(&batch).await?;
            Ok::<_, DataError>((batch.len(), metrics))
        })
        .buffered(concurrency.max(1));

    while let Some(result) = results.next().await {
        let (count, metrics) = result?;
        merged.extend(metrics);
        on_batch(count);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn tickers(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("T{i:03}")).collect()
    }

    /// Fetcher that records batches and prices each ticker by its index.
    #[derive(Debug, Default)]
    struct RecordingFetcher {
        batches: Mutex<Vec<Vec<String>>>,
        fail_on: Option<String>,
    }

    impl MetricFetcher for RecordingFetcher {
        async fn fetch_batch(&self, tickers: &[String]) -> Result<BatchMetrics> {
            self.batches.lock().unwrap().push(tickers.to_vec());
            if let Some(bad) = &self.fail_on
                && tickers.contains(bad)
            {
                return Err(DataError::Provider(format!("batch containing {bad} failed")));
            }
            Ok(tickers
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    (
                        t.clone(),
                        RawMetrics {
                            price: Some(i as f64 + 1.0),
                            ..RawMetrics::default()
                        },
                    )
                })
                .collect())
        }
    }

    #[test]
    fn test_chunk_tickers_no_drop_or_duplicate() {
        let all = tickers(250);
        let batches = chunk_tickers(&all, 100);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 100);
        assert_eq!(batches[2].len(), 50);

        let flattened: Vec<String> = batches.into_iter().flatten().collect();
        assert_eq!(flattened, all);
    }

    #[test]
    fn test_chunk_tickers_empty() {
        assert!(chunk_tickers(&[], 100).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_merges_every_batch() {
        let fetcher = RecordingFetcher::default();
        let all = tickers(205);
        let mut completed = Vec::new();

        let merged = fetch_all(&fetcher, &all, 100, 2, |n| completed.push(n))
            .await
            .unwrap();

        assert_eq!(merged.len(), 205);
        assert_eq!(completed, vec![100, 100, 5]);
        assert_eq!(fetcher.batches.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_propagates_batch_failure() {
        let fetcher = RecordingFetcher {
            fail_on: Some("T150".to_string()),
            ..RecordingFetcher::default()
        };
        let result = fetch_all(&fetcher, &tickers(200), 100, 1, |_| {}).await;
        assert!(matches!(result, Err(DataError::Provider(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_rejects_zero_batch_size() {
        let fetcher = RecordingFetcher::default();
        let result = fetch_all(&fetcher, &tickers(3), 0, 1, |_| {}).await;
        assert!(matches!(result, Err(DataError::Config(_))));
    }
}
