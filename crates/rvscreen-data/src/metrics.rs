//! Raw fundamental metrics as reported by the provider.

use serde::{Deserialize, Serialize};

/// Per-symbol fundamental fields. Any field may be absent when the provider
/// has no value for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    /// Latest price
    pub price: Option<f64>,
    /// Price to earnings ratio
    pub pe_ratio: Option<f64>,
    /// Price to book ratio
    pub price_to_book: Option<f64>,
    /// Price to sales ratio
    pub price_to_sales: Option<f64>,
    /// Enterprise value
    pub enterprise_value: Option<f64>,
    /// EBITDA (TTM)
    pub ebitda: Option<f64>,
    /// Gross profit (TTM)
    pub gross_profit: Option<f64>,
    /// PEG ratio
    pub peg_ratio: Option<f64>,
    /// Debt to equity ratio
    pub debt_to_equity: Option<f64>,
}

impl RawMetrics {
    /// True when the provider returned a record but none of its fields.
    pub const fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.pe_ratio.is_none()
            && self.price_to_book.is_none()
            && self.price_to_sales.is_none()
            && self.enterprise_value.is_none()
            && self.ebitda.is_none()
            && self.gross_profit.is_none()
            && self.peg_ratio.is_none()
            && self.debt_to_equity.is_none()
    }
}
