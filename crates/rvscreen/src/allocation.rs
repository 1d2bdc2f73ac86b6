//! Equal-weight allocation of a budget across the selected rows.

use crate::error::AllocationError;
use rvscreen_output::AllocationSummary;
use rvscreen_rank::MetricRow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// A validated, non-negative, finite portfolio size.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Budget(f64);

impl Budget {
    /// Validate a budget amount.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::NonFiniteBudget`] for NaN or infinity and
    /// [`AllocationError::NegativeBudget`] for amounts below zero.
    pub fn new(amount: f64) -> Result<Self, AllocationError> {
        if !amount.is_finite() {
            return Err(AllocationError::NonFiniteBudget);
        }
        if amount < 0.0 {
            return Err(AllocationError::NegativeBudget(amount));
        }
        // Normalizes -0.0.
        Ok(Self(amount + 0.0))
    }

    /// The amount.
    pub const fn amount(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Budget {
    type Error = AllocationError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Budget> for f64 {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

impl FromStr for Budget {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let amount = text
            .parse::<f64>()
            .map_err(|_| AllocationError::NotANumber(text.to_string()))?;
        Self::new(amount)
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Outcome of an allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Total budget.
    pub budget: Budget,
    /// Budget per selected row.
    pub position_size: f64,
    /// Sum of shares times price over priced rows.
    pub total_spent: f64,
    /// Budget left after buying whole shares.
    pub cash_remaining: f64,
    /// Rows whose share count is undefined for lack of a positive price.
    pub unpriced: Vec<String>,
}

impl From<&Allocation> for AllocationSummary {
    fn from(allocation: &Allocation) -> Self {
        Self {
            budget: allocation.budget.amount(),
            position_size: allocation.position_size,
            total_spent: allocation.total_spent,
            cash_remaining: allocation.cash_remaining,
            unpriced: allocation.unpriced.clone(),
        }
    }
}

/// Whole shares affordable with `position_size` at `price`.
///
/// `None` when the price is missing, non-finite or not positive.
pub fn shares_for(position_size: f64, price: Option<f64>) -> Option<u64> {
    let price = price.filter(|p| p.is_finite() && *p > 0.0)?;
    let mut shares = (position_size / price).floor().max(0.0);
    // Division rounding can overshoot by one share.
    while shares > 0.0 && shares * price > position_size {
        shares -= 1.0;
    }
    Some(shares as u64)
}

/// Split `budget` equally across `rows` and set each row's share count.
///
/// Rows without a usable price get `shares_to_buy = None` and are listed in
/// [`Allocation::unpriced`]; their share of the budget stays in cash.
///
/// # Errors
///
/// Returns [`AllocationError::NoPositions`] if `rows` is empty.
pub fn allocate(rows: &mut [MetricRow], budget: Budget) -> Result<Allocation, AllocationError> {
    if rows.is_empty() {
        return Err(AllocationError::NoPositions);
    }

    let position_size = budget.amount() / rows.len() as f64;
    let mut total_spent = 0.0;
    let mut unpriced = Vec::new();

    for row in rows.iter_mut() {
        row.shares_to_buy = shares_for(position_size, row.price);
        match (row.shares_to_buy, row.price) {
            (Some(shares), Some(price)) => total_spent += shares as f64 * price,
            _ => {
                warn!(symbol = %row.display_name(), price = ?row.price, "no usable price, share count undefined");
                unpriced.push(row.display_name());
            }
        }
    }

    let cash_remaining = (budget.amount() - total_spent).max(0.0);
    info!(
        positions = rows.len(),
        position_size, total_spent, cash_remaining, "allocated budget"
    );

    Ok(Allocation {
        budget,
        position_size,
        total_spent,
        cash_remaining,
        unpriced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn row(position: usize, ticker: &str, price: Option<f64>) -> MetricRow {
        MetricRow::new(position, Some(ticker.to_string()), price)
    }

    #[test]
    fn test_equal_weight_shares() {
        let mut rows = vec![row(0, "A", Some(50.0)), row(1, "B", Some(200.0))];
        let allocation = allocate(&mut rows, Budget::new(1000.0).unwrap()).unwrap();

        assert_relative_eq!(allocation.position_size, 500.0);
        assert_eq!(rows[0].shares_to_buy, Some(10));
        assert_eq!(rows[1].shares_to_buy, Some(2));
        assert_relative_eq!(allocation.total_spent, 900.0);
        assert_relative_eq!(allocation.cash_remaining, 100.0);
        assert!(allocation.unpriced.is_empty());
    }

    #[test]
    fn test_unpriced_rows_are_surfaced() {
        let mut rows = vec![
            row(0, "A", Some(10.0)),
            row(1, "B", None),
            row(2, "C", Some(0.0)),
            row(3, "D", Some(-4.0)),
        ];
        let allocation = allocate(&mut rows, Budget::new(400.0).unwrap()).unwrap();

        assert_eq!(rows[0].shares_to_buy, Some(10));
        assert!(rows[1..].iter().all(|r| r.shares_to_buy.is_none()));
        assert_eq!(allocation.unpriced, vec!["B", "C", "D"]);
        assert_relative_eq!(allocation.total_spent, 100.0);
        assert_relative_eq!(allocation.cash_remaining, 300.0);
    }

    #[test]
    fn test_spend_never_exceeds_budget() {
        let prices = [0.1, 0.3, 0.7, 3.3, 13.37, 99.99, 1234.5];
        let mut rows: Vec<_> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| row(i, "X", Some(*p)))
            .collect();
        let budget = Budget::new(10_000.01).unwrap();
        let allocation = allocate(&mut rows, budget).unwrap();

        let spent: f64 = rows
            .iter()
            .map(|r| r.shares_to_buy.unwrap() as f64 * r.price.unwrap())
            .sum();
        assert!(spent <= budget.amount());
        for r in &rows {
            assert!(r.shares_to_buy.unwrap() as f64 * r.price.unwrap() <= allocation.position_size);
        }
    }

    #[test]
    fn test_no_positions() {
        let mut rows: Vec<MetricRow> = Vec::new();
        assert_eq!(
            allocate(&mut rows, Budget::new(100.0).unwrap()),
            Err(AllocationError::NoPositions)
        );
    }

    #[test]
    fn test_zero_budget() {
        let mut rows = vec![row(0, "A", Some(10.0))];
        let allocation = allocate(&mut rows, Budget::new(0.0).unwrap()).unwrap();
        assert_eq!(rows[0].shares_to_buy, Some(0));
        assert_relative_eq!(allocation.cash_remaining, 0.0);
    }

    #[rstest]
    #[case("1000", Ok(1000.0))]
    #[case("  2500.50\n", Ok(2500.5))]
    #[case("0", Ok(0.0))]
    #[case("-0", Ok(0.0))]
    #[case("-1", Err(AllocationError::NegativeBudget(-1.0)))]
    #[case("abc", Err(AllocationError::NotANumber("abc".to_string())))]
    #[case("", Err(AllocationError::NotANumber(String::new())))]
    #[case("NaN", Err(AllocationError::NonFiniteBudget))]
    #[case("inf", Err(AllocationError::NonFiniteBudget))]
    fn test_budget_parsing(#[case] input: &str, #[case] expected: Result<f64, AllocationError>) {
        assert_eq!(input.parse::<Budget>().map(Budget::amount), expected);
    }

    #[test]
    fn test_budget_serde_rejects_negative() {
        let budget: Budget = serde_json::from_str("12.5").unwrap();
        assert_relative_eq!(budget.amount(), 12.5);
        assert!(serde_json::from_str::<Budget>("-3").is_err());
    }

    #[rstest]
    #[case(500.0, Some(50.0), Some(10))]
    #[case(500.0, Some(200.0), Some(2))]
    #[case(499.99, Some(50.0), Some(9))]
    #[case(10.0, Some(f64::NAN), None)]
    #[case(10.0, None, None)]
    fn test_shares_for(#[case] position: f64, #[case] price: Option<f64>, #[case] expected: Option<u64>) {
        assert_eq!(shares_for(position, price), expected);
    }
}
