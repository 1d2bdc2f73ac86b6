//! HTTP client for the batch endpoint with bounded retries.

use super::response::parse_batch;
use crate::batch::{BatchMetrics, MetricFetcher};
use crate::config::ProviderConfig;
use crate::error::{DataError, Result};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Endpoint types requested for every symbol.
const BATCH_TYPES: &str = "price,quote,advanced-stats";

/// Batch metric fetcher backed by the IEX Cloud REST API.
pub struct IexBatchClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl std::fmt::Debug for IexBatchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IexBatchClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IexBatchClient {
    /// Create a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Config`] for invalid settings, or
    /// [`DataError::Network`] if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("rvscreen/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn batch_url(&self) -> String {
        format!("{}/stock/market/batch", self.config.base_url)
    }

    /// One request, no retries.
    async fn request_batch(&self, tickers: &[String]) -> Result<BatchMetrics> {
        let url = self.batch_url();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbols", tickers.join(",").as_str()),
                ("types", BATCH_TYPES),
                ("token", self.config.api_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        parse_batch(&body)
    }
}

impl MetricFetcher for IexBatchClient {
    async fn fetch_batch(&self, tickers: &[String]) -> Result<BatchMetrics> {
        if tickers.is_empty() {
            return Ok(BatchMetrics::new());
        }
        if let Some(bad) = tickers.iter().find(|t| t.trim().is_empty()) {
            return Err(DataError::InvalidSymbol(format!("{bad:?}")));
        }

        let retry = &self.config.retry;
        let mut attempt = 0;
        loop {
            match self.request_batch(tickers).await {
                Ok(metrics) => {
                    debug!(
                        requested = tickers.len(),
                        returned = metrics.len(),
                        "metric batch fetched"
                    );
                    return Ok(metrics);
                }
                Err(err) if attempt < retry.max_retries && err.is_retryable(&retry.retry_on_status) => {
                    let delay = retry.delay_for_attempt(attempt);
                    attempt += 1;
                    warn!(
                        error = %err,
                        attempt,
                        max_retries = retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "metric batch failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(err) => {
                    return Err(DataError::Provider(format!(
                        "batch of {} symbols failed after {} attempt(s): {err}",
                        tickers.len(),
                        attempt + 1
                    )));
                }
            }
        }
    }
}
