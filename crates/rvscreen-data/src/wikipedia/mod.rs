//! S&P 500 constituents scraped from Wikipedia.

pub mod constituents;

pub use constituents::{DEFAULT_CONSTITUENTS_URL, WikipediaSymbolSource, parse_constituents};
