//! rvscreen CLI binary.
//!
//! Screens an equity universe for relative value and sizes an equal-weight
//! portfolio of the cheapest names.

mod logging;
mod prompt;

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rvscreen::data::{
    GicsSector, IexBatchClient, ProviderConfig, SymbolRecord, SymbolSource, WikipediaSymbolSource,
};
use rvscreen::output::{
    AllocationSummary, DEFAULT_REPORT_PATH, ExportFormat, Exporter, FileSink, ReportSink,
    stats_table,
};
use rvscreen::rank::{DEFAULT_TOP_N, DegeneratePolicy, RankConfig, TickerPolicy, metric_registry};
use rvscreen::{Budget, ScreenConfig, ScreenEvent, Screener, StaticUniverse, Universe, allocate};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rvscreen")]
#[command(about = "rvscreen: relative-value stock screener", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the universe by RV score and size an equal-weight portfolio
    Screen(ScreenArgs),

    /// Print the symbol universe
    Universe {
        /// CSV file with ticker,name[,sector] columns instead of the S&P 500 page
        #[arg(long, env = "RVSCREEN_UNIVERSE_FILE")]
        universe_file: Option<PathBuf>,

        /// Print constituent counts per GICS sector
        #[arg(long)]
        sectors: bool,
    },

    /// List the tracked valuation metrics
    Metrics,
}

#[derive(Args)]
struct ScreenArgs {
    /// Portfolio size; prompted for when omitted
    #[arg(long, env = "RVSCREEN_BUDGET")]
    budget: Option<String>,

    /// Number of stocks to select
    #[arg(long, default_value_t = DEFAULT_TOP_N, env = "RVSCREEN_TOP_N")]
    top_n: usize,

    /// Report destination
    #[arg(short, long, default_value = DEFAULT_REPORT_PATH, env = "RVSCREEN_OUTPUT")]
    output: PathBuf,

    /// Report format (default: inferred from the output extension)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// CSV file with ticker,name[,sector] columns instead of the S&P 500 page
    #[arg(long, env = "RVSCREEN_UNIVERSE_FILE")]
    universe_file: Option<PathBuf>,

    /// Symbols per provider request
    #[arg(long, env = "RVSCREEN_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Provider requests in flight at once
    #[arg(long, env = "RVSCREEN_CONCURRENCY")]
    concurrency: Option<usize>,

    /// What to do when a ranking metric has no data at all
    #[arg(long, value_enum, default_value_t = DegenerateArg::Fail)]
    degenerate: DegenerateArg,

    /// Blank the ticker of symbols the provider returned nothing for
    #[arg(long)]
    blank_missing_tickers: bool,

    /// Also write a JSON record of the whole run
    #[arg(long)]
    report_json: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
    PrettyJson,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => Self::Csv,
            FormatArg::Json => Self::Json,
            FormatArg::PrettyJson => Self::PrettyJson,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DegenerateArg {
    /// Stop the run
    Fail,
    /// Leave the metric out of the RV score
    Skip,
}

impl From<DegenerateArg> for DegeneratePolicy {
    fn from(arg: DegenerateArg) -> Self {
        match arg {
            DegenerateArg::Fail => Self::Fail,
            DegenerateArg::Skip => Self::SkipColumn,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Screen(args) => screen(args).await?,
        Commands::Universe {
            universe_file,
            sectors,
        } => print_universe(universe_file.as_deref(), sectors).await?,
        Commands::Metrics => list_metrics(),
    }

    Ok(())
}

async fn screen(args: ScreenArgs) -> Result<(), Box<dyn std::error::Error>> {
    // A budget given on the command line is checked before any network work;
    // otherwise it is asked for once the ranking is done.
    let budget = args.budget.as_deref().map(str::parse::<Budget>).transpose()?;

    let mut provider = ProviderConfig::from_env()?;
    if let Some(batch_size) = args.batch_size {
        provider = provider.with_batch_size(batch_size);
    }
    if let Some(concurrency) = args.concurrency {
        provider = provider.with_concurrency(concurrency);
    }

    let rank = RankConfig {
        top_n: args.top_n,
        degenerate_policy: args.degenerate.into(),
        ticker_policy: if args.blank_missing_tickers {
            TickerPolicy::Blank
        } else {
            TickerPolicy::Preserve
        },
    };
    let config = ScreenConfig::from_provider(&provider, rank);
    config.validate()?;
    let fetcher = IexBatchClient::new(provider)?;

    match &args.universe_file {
        Some(path) => {
            let source = StaticUniverse::from_csv_path(path)?;
            run_screen(source, fetcher, config, budget, &args).await
        }
        None => {
            let source = WikipediaSymbolSource::new()?;
            run_screen(source, fetcher, config, budget, &args).await
        }
    }
}

async fn run_screen<S: SymbolSource>(
    source: S,
    fetcher: IexBatchClient,
    config: ScreenConfig,
    budget: Option<Budget>,
    args: &ScreenArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.set_message("Loading universe...");

    let screener = Screener::new(source, fetcher, config);
    let result = screener
        .run(|event| match event {
            ScreenEvent::UniverseLoaded { symbols } => {
                pb.set_length(symbols as u64);
                pb.set_message("Fetching metrics...");
            }
            ScreenEvent::BatchFetched { symbols } => pb.inc(symbols as u64),
        })
        .await;

    let mut screening = match result {
        Ok(screening) => {
            pb.finish_with_message(format!(
                "Fetched {} symbols ({} without data)",
                screening.universe.size(),
                screening.missing.len()
            ));
            screening
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    if !screening.missing.is_empty() {
        warn!(
            count = screening.missing.len(),
            symbols = %screening.missing.join(","),
            "provider returned no data; metrics imputed"
        );
    }

    let stdin = io::stdin();
    let budget = prompt::resolve_budget(budget, &mut stdin.lock(), &mut io::stdout())?;
    let allocation = allocate(screening.ranked.rows_mut(), budget)?;
    let table = screening.report_table();

    let sink = match args.format {
        Some(format) => FileSink::new(&args.output, format.into()),
        None => FileSink::from_path(&args.output)?,
    };
    sink.write(&table)?;

    if let Some(path) = &args.report_json {
        screening
            .run_report(config.rank.top_n, Some(&allocation))
            .export_to_file(path, ExportFormat::PrettyJson)?;
        info!(path = %path.display(), "run report written");
    }

    println!("{}", table.to_ascii_table());
    println!("{}", stats_table(&table.column_stats()?));
    println!("{}", AllocationSummary::from(&allocation));
    println!("\nReport written to {}", sink.path().display());

    Ok(())
}

async fn load_universe(path: Option<&Path>) -> Result<Vec<SymbolRecord>, Box<dyn std::error::Error>> {
    let records = match path {
        Some(path) => StaticUniverse::from_csv_path(path)?.into_records(),
        None => WikipediaSymbolSource::new()?.fetch_universe().await?,
    };
    Ok(records)
}

async fn print_universe(path: Option<&Path>, sectors: bool) -> Result<(), Box<dyn std::error::Error>> {
    let universe = StaticUniverse::new(load_universe(path).await?);

    if sectors {
        println!("GICS Sectors:");
        println!("=============\n");
        let counts = universe.sector_counts();
        for sector in GicsSector::ALL {
            println!(
                "{:2} - {:<25} {:>4}",
                sector.code(),
                sector.name(),
                counts.get(&sector).copied().unwrap_or(0)
            );
        }
        let classified: usize = counts.values().sum();
        println!("\nUnclassified: {}", universe.size() - classified);
        return Ok(());
    }

    println!("{:<8} {:<40} {}", "Ticker", "Name", "Sector");
    println!("{}", "-".repeat(80));
    for record in universe.records() {
        println!(
            "{:<8} {:<40} {}",
            record.ticker,
            record.name,
            record.sector.map(|s| s.name()).unwrap_or("-")
        );
    }
    println!("\n{} symbols", universe.size());
    Ok(())
}

fn list_metrics() {
    println!("Tracked Metrics:");
    println!("================\n");

    for info in metric_registry() {
        println!(
            "{:<10} {:<12} {:<9} {}",
            info.name,
            info.label,
            if info.in_rv_score { "RV score" } else { "info" },
            info.description
        );
    }
}
