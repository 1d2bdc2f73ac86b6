//! Metric provider configuration.

use crate::error::{DataError, Result};
use crate::retry::RetryPolicy;
use std::fmt;
use std::time::Duration;

/// Default provider endpoint (IEX Cloud sandbox).
pub const DEFAULT_BASE_URL: &str = "https://sandbox.iexapis.com/stable";

/// Symbols per batch request, the provider's batch limit.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Batches in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "IEX_CLOUD_API_TOKEN";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "IEX_CLOUD_BASE_URL";

/// Settings handed to the metric fetcher at construction.
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// API token appended to each request.
    pub api_token: String,
    /// Maximum symbols per batch request.
    pub batch_size: usize,
    /// Maximum batches fetched concurrently.
    pub concurrency: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for each batch.
    pub retry: RetryPolicy,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("batch_size", &self.batch_size)
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration with default settings for the given token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Load from the process environment, reading a `.env` file first if present.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Config`] if the token variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is normal; the variables may come from the shell.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Config`] if the token variable is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_ENV)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DataError::Config(format!("{TOKEN_ENV} is not set")))?;

        let mut config = Self::new(token.trim());
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }
        Ok(config)
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the batch size.
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Override the batch concurrency.
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Override the request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Check the settings that would otherwise fail deep inside a run.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Config`] for a zero batch size or concurrency.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DataError::Config("batch size must be at least 1".to_string()));
        }
        if self.concurrency == 0 {
            return Err(DataError::Config("concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}
