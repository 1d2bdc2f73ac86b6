//! Metric Registry
//!
//! The valuation metrics tracked for every symbol. All of them are
//! "cheaper is lower": a smaller ratio means a cheaper stock, so a lower
//! percentile is better. Debt-to-equity is tracked and scored but does not
//! enter the RV score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked metric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Price / earnings
    PriceToEarnings,
    /// Price / book value
    PriceToBook,
    /// Price / sales
    PriceToSales,
    /// Enterprise value / EBITDA
    EvToEbitda,
    /// Enterprise value / gross profit
    EvToGrossProfit,
    /// Price/earnings to growth
    Peg,
    /// Debt / equity
    DebtToEquity,
}

impl Metric {
    /// Number of tracked metrics.
    pub const COUNT: usize = 7;

    /// Every tracked metric, in report column order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::PriceToEarnings,
        Self::PriceToBook,
        Self::PriceToSales,
        Self::EvToEbitda,
        Self::EvToGrossProfit,
        Self::Peg,
        Self::DebtToEquity,
    ];

    /// The six metrics averaged into the RV score.
    pub const RANKING: [Self; 6] = [
        Self::PriceToEarnings,
        Self::PriceToBook,
        Self::PriceToSales,
        Self::EvToEbitda,
        Self::EvToGrossProfit,
        Self::Peg,
    ];

    /// Position of this metric in [`Metric::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::PriceToEarnings => 0,
            Self::PriceToBook => 1,
            Self::PriceToSales => 2,
            Self::EvToEbitda => 3,
            Self::EvToGrossProfit => 4,
            Self::Peg => 5,
            Self::DebtToEquity => 6,
        }
    }

    /// Snake-case identifier.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PriceToEarnings => "pe_ratio",
            Self::PriceToBook => "pb_ratio",
            Self::PriceToSales => "ps_ratio",
            Self::EvToEbitda => "ev_ebitda",
            Self::EvToGrossProfit => "ev_gp",
            Self::Peg => "peg_ratio",
            Self::DebtToEquity => "de_ratio",
        }
    }

    /// Report column header for the raw value.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceToEarnings => "P/E Ratio",
            Self::PriceToBook => "P/B Ratio",
            Self::PriceToSales => "P/S Ratio",
            Self::EvToEbitda => "EV/EBITDA",
            Self::EvToGrossProfit => "EV/GP",
            Self::Peg => "PEG Ratio",
            Self::DebtToEquity => "D/E Ratio",
        }
    }

    /// Report column header for the percentile.
    pub const fn percentile_label(self) -> &'static str {
        match self {
            Self::PriceToEarnings => "P/E Percentile",
            Self::PriceToBook => "P/B Percentile",
            Self::PriceToSales => "P/S Percentile",
            Self::EvToEbitda => "EV/EBITDA Percentile",
            Self::EvToGrossProfit => "EV/GP Percentile",
            Self::Peg => "PEG Percentile",
            Self::DebtToEquity => "D/E Percentile",
        }
    }

    /// Short display name.
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::PriceToEarnings => "P/E",
            Self::PriceToBook => "P/B",
            Self::PriceToSales => "P/S",
            Self::EvToEbitda => "EV/EBITDA",
            Self::EvToGrossProfit => "EV/GP",
            Self::Peg => "PEG",
            Self::DebtToEquity => "D/E",
        }
    }

    /// One-line description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::PriceToEarnings => "Share price relative to trailing earnings per share",
            Self::PriceToBook => "Share price relative to book value per share",
            Self::PriceToSales => "Share price relative to sales per share",
            Self::EvToEbitda => "Enterprise value relative to EBITDA (derived)",
            Self::EvToGrossProfit => "Enterprise value relative to gross profit (derived)",
            Self::Peg => "P/E relative to expected earnings growth",
            Self::DebtToEquity => "Total debt relative to shareholders' equity",
        }
    }

    /// Whether the metric's percentile enters the RV score.
    pub const fn in_rv_score(self) -> bool {
        !matches!(self, Self::DebtToEquity)
    }

    /// Look up a metric by [`Metric::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Metric metadata for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricInfo {
    /// The metric
    pub metric: Metric,
    /// Identifier
    pub name: &'static str,
    /// Report header
    pub label: &'static str,
    /// Description
    pub description: &'static str,
    /// Whether it contributes to the RV score
    pub in_rv_score: bool,
}

impl From<Metric> for MetricInfo {
    fn from(metric: Metric) -> Self {
        Self {
            metric,
            name: metric.name(),
            label: metric.label(),
            description: metric.description(),
            in_rv_score: metric.in_rv_score(),
        }
    }
}

/// Metadata for every tracked metric, in column order.
pub fn metric_registry() -> Vec<MetricInfo> {
    Metric::ALL.into_iter().map(MetricInfo::from).collect()
}
