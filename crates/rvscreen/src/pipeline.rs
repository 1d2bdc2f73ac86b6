//! End-to-end screening pipeline.
//!
//! Stages run strictly in sequence: the universe is loaded, metrics are
//! fetched batch by batch and reassembled in universe order, then the table
//! is built, imputed, scored and ranked. A failure in any stage ends the run
//! without producing a partial table.

use crate::allocation::Allocation;
use crate::error::Result;
use crate::universe::{StaticUniverse, Universe};
use rvscreen_data::config::{DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY};
use rvscreen_data::{DataError, MetricFetcher, ProviderConfig, SymbolSource, fetch_all};
use rvscreen_output::{AllocationSummary, ReportTable, RunReport, RunReportBuilder};
use rvscreen_rank::{
    CompositeRanker, Imputer, MetricTableBuilder, PercentileScorer, RankConfig, RankedTable,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Settings for one screening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Symbols per provider request.
    pub batch_size: usize,
    /// Provider requests in flight at once.
    pub concurrency: usize,
    /// Ranking settings.
    pub rank: RankConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            rank: RankConfig::default(),
        }
    }
}

impl ScreenConfig {
    /// Take batching settings from a provider configuration.
    pub const fn from_provider(provider: &ProviderConfig, rank: RankConfig) -> Self {
        Self {
            batch_size: provider.batch_size,
            concurrency: provider.concurrency,
            rank,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero batch size, zero concurrency or an invalid rank config.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DataError::Config("batch size must be at least 1".to_string()).into());
        }
        if self.concurrency == 0 {
            return Err(DataError::Config("concurrency must be at least 1".to_string()).into());
        }
        self.rank.validate()?;
        Ok(())
    }
}

/// Progress notifications emitted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    /// The symbol universe was loaded.
    UniverseLoaded {
        /// Number of symbols in the universe
        symbols: usize,
    },
    /// A metric batch completed.
    BatchFetched {
        /// Number of symbols in the batch
        symbols: usize,
    },
}

/// Result of a screening run, before allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Screening {
    /// The screened universe.
    pub universe: StaticUniverse,
    /// Ranked and truncated rows.
    pub ranked: RankedTable,
    /// Symbols the provider returned nothing for.
    pub missing: Vec<String>,
}

impl Screening {
    /// The selection as report rows.
    pub fn report_table(&self) -> ReportTable {
        ReportTable::from_rows(self.ranked.rows())
    }

    /// A full record of the run, with the allocation if one was made.
    pub fn run_report(&self, top_n: usize, allocation: Option<&Allocation>) -> RunReport {
        let mut builder = RunReportBuilder::new()
            .universe_size(self.universe.size())
            .top_n(top_n)
            .missing(self.missing.clone())
            .scored_metrics(
                self.ranked
                    .scored_metrics()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            )
            .rows(self.report_table());
        if let Some(allocation) = allocation {
            builder = builder.allocation(AllocationSummary::from(allocation));
        }
        builder.build()
    }
}

/// Runs the screen against a symbol source and a metric fetcher.
#[derive(Debug)]
pub struct Screener<S, F> {
    source: S,
    fetcher: F,
    config: ScreenConfig,
}

impl<S, F> Screener<S, F>
where
    S: SymbolSource,
    F: MetricFetcher + Sync,
{
    /// Create a screener.
    pub const fn new(source: S, fetcher: F, config: ScreenConfig) -> Self {
        Self {
            source,
            fetcher,
            config,
        }
    }

    /// The run configuration.
    pub const fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Execute the screen.
    ///
    /// `on_event` is called once the universe is loaded and after each
    /// completed metric batch.
    ///
    /// # Errors
    ///
    /// Fails with the source, provider or ranking error that stopped the run.
    pub async fn run<E>(&self, mut on_event: E) -> Result<Screening>
    where
        E: FnMut(ScreenEvent),
    {
        self.config.validate()?;

        let universe = StaticUniverse::new(self.source.fetch_universe().await?);
        if universe.size() == 0 {
            return Err(DataError::SourceUnavailable(
                "symbol source returned no symbols".to_string(),
            )
            .into());
        }
        info!(symbols = universe.size(), "universe loaded");
        on_event(ScreenEvent::UniverseLoaded {
            symbols: universe.size(),
        });

        let tickers = universe.symbols();
        let fetched = fetch_all(
            &self.fetcher,
            &tickers,
            self.config.batch_size,
            self.config.concurrency,
            |symbols| on_event(ScreenEvent::BatchFetched { symbols }),
        )
        .await?;

        let missing: Vec<String> = tickers
            .into_iter()
            .filter(|ticker| !fetched.contains_key(ticker))
            .collect();
        for ticker in &missing {
            debug!(ticker = %ticker, "provider returned no data");
        }
        info!(
            fetched = fetched.len(),
            missing = missing.len(),
            "metrics fetched"
        );

        let rank = self.config.rank;
        let rows = MetricTableBuilder::new(rank.ticker_policy).build(universe.records(), &fetched);
        let imputed = Imputer::new(rank.degenerate_policy).impute(rows)?;
        let scored = PercentileScorer::new().score(imputed);
        let ranked = CompositeRanker::new(rank.top_n).rank(scored)?;
        info!(selected = ranked.len(), top_n = rank.top_n, "ranking complete");

        Ok(Screening {
            universe,
            ranked,
            missing,
        })
    }
}
