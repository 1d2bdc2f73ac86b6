//! Constituents table scraping.

use crate::error::{DataError, Result};
use crate::gics::GicsSector;
use crate::symbols::{SymbolRecord, SymbolSource};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// Page listing the current S&P 500 constituents.
pub const DEFAULT_CONSTITUENTS_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

const USER_AGENT: &str = concat!("rvscreen/", env!("CARGO_PKG_VERSION"));

/// Symbol source reading the constituents table of a Wikipedia page.
#[derive(Debug, Clone)]
pub struct WikipediaSymbolSource {
    client: reqwest::Client,
    url: String,
}

impl WikipediaSymbolSource {
    /// Create a source for the default S&P 500 page.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Network`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_CONSTITUENTS_URL)
    }

    /// Create a source for a different page with the same table layout.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Network`] if the HTTP client cannot be built.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl SymbolSource for WikipediaSymbolSource {
    async fn fetch_universe(&self) -> Result<Vec<SymbolRecord>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DataError::SourceUnavailable(format!("{}: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(DataError::SourceUnavailable(format!(
                "{}: HTTP {}",
                self.url,
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| DataError::SourceUnavailable(format!("{}: {e}", self.url)))?;

        let records = parse_constituents(&html)?;
        info!(symbols = records.len(), url = %self.url, "loaded symbol universe");
        Ok(records)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DataError::Parse(format!("bad selector {css:?}: {e:?}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Parse the constituents table out of the page HTML.
///
/// Uses the table with id `constituents`, falling back to the first
/// `wikitable`. Column 0 is the ticker, column 1 the security name and
/// column 2, when present, the GICS sector.
///
/// # Errors
///
/// Returns [`DataError::SourceUnavailable`] if no table or no rows are found.
pub fn parse_constituents(html: &str) -> Result<Vec<SymbolRecord>> {
    let document = Html::parse_document(html);
    let by_id = selector("table#constituents")?;
    let wikitable = selector("table.wikitable")?;
    let rows = selector("tr")?;
    let cells = selector("td")?;

    let table = document
        .select(&by_id)
        .next()
        .or_else(|| document.select(&wikitable).next())
        .ok_or_else(|| DataError::SourceUnavailable("no constituents table found".to_string()))?;

    let mut records = Vec::new();
    for row in table.select(&rows) {
        let columns: Vec<String> = row.select(&cells).map(cell_text).collect();
        // Header rows carry <th> cells only.
        let [ticker, name, rest @ ..] = columns.as_slice() else {
            continue;
        };
        if ticker.is_empty() {
            debug!(name = %name, "skipping constituent row without ticker");
            continue;
        }

        records.push(SymbolRecord {
            ticker: ticker.clone(),
            name: name.clone(),
            sector: rest.first().and_then(|s| GicsSector::from_name(s)),
        });
    }

    if records.is_empty() {
        return Err(DataError::SourceUnavailable(
            "constituents table has no rows".to_string(),
        ));
    }

    Ok(records)
}
