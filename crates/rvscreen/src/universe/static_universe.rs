//! In-memory and CSV-backed universes.

use super::Universe;
use rvscreen_data::{DataError, GicsSector, SymbolRecord, SymbolSource};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// A fixed list of symbols.
///
/// Duplicate tickers are dropped on construction, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticUniverse {
    records: Vec<SymbolRecord>,
}

#[derive(Debug, Deserialize)]
struct UniverseRow {
    ticker: String,
    name: String,
    #[serde(default)]
    sector: Option<String>,
}

impl StaticUniverse {
    /// Create a universe from records, dropping duplicate and blank tickers.
    pub fn new(records: Vec<SymbolRecord>) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let records = records
            .into_iter()
            .filter(|record| {
                if record.ticker.trim().is_empty() {
                    warn!(name = %record.name, "dropping symbol with blank ticker");
                    return false;
                }
                if !seen.insert(record.ticker.clone()) {
                    warn!(ticker = %record.ticker, "dropping duplicate ticker");
                    return false;
                }
                true
            })
            .collect();

        Self { records }
    }

    /// Read a `ticker,name[,sector]` CSV with a header row.
    ///
    /// Unknown sector names are ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::SourceUnavailable`] if the CSV is malformed or lists no symbols.
    pub fn from_reader<R: Read>(reader: R) -> rvscreen_data::Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<UniverseRow>() {
            let row = row.map_err(|e| DataError::SourceUnavailable(format!("universe CSV: {e}")))?;
            let mut record = SymbolRecord::new(row.ticker, row.name);
            if let Some(sector) = row.sector.as_deref().filter(|s| !s.is_empty()) {
                match GicsSector::from_name(sector) {
                    Some(sector) => record = record.with_sector(sector),
                    None => warn!(ticker = %record.ticker, sector, "unknown GICS sector"),
                }
            }
            records.push(record);
        }

        let universe = Self::new(records);
        if universe.records.is_empty() {
            return Err(DataError::SourceUnavailable(
                "universe CSV lists no symbols".to_string(),
            ));
        }
        Ok(universe)
    }

    /// Read a universe CSV from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::SourceUnavailable`] if the file cannot be opened or parsed.
    pub fn from_csv_path(path: impl AsRef<Path>) -> rvscreen_data::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| DataError::SourceUnavailable(format!("{}: {e}", path.display())))?;
        let universe = Self::from_reader(file)?;
        info!(symbols = universe.size(), path = %path.display(), "loaded universe file");
        Ok(universe)
    }

    /// Consume the universe, returning its records.
    pub fn into_records(self) -> Vec<SymbolRecord> {
        self.records
    }
}

impl Universe for StaticUniverse {
    fn records(&self) -> &[SymbolRecord] {
        &self.records
    }
}

impl SymbolSource for StaticUniverse {
    async fn fetch_universe(&self) -> rvscreen_data::Result<Vec<SymbolRecord>> {
        if self.records.is_empty() {
            return Err(DataError::SourceUnavailable("universe is empty".to_string()));
        }
        Ok(self.records.clone())
    }
}
