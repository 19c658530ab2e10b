//! Cost report data models

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Cost for a single calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRecord {
    /// Calendar day (`YYYY-MM-DD`)
    pub date: String,

    /// Amount spent on that day
    pub cost: Decimal,
}

impl CostRecord {
    /// Create a new record
    pub fn new(date: impl Into<String>, cost: Decimal) -> Self {
        Self {
            date: date.into(),
            cost,
        }
    }
}

/// Per-day costs for one billing period plus their total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostReport {
    records: Vec<CostRecord>,
    total: Decimal,
}

impl CostReport {
    /// Build a report; the total is always recomputed from the records
    pub fn new(records: Vec<CostRecord>) -> Self {
        let total = records.iter().map(|r| r.cost).sum();
        Self { records, total }
    }

    /// Records in provider (chronological) order
    pub fn records(&self) -> &[CostRecord] {
        &self.records
    }

    /// Sum of all record costs
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Number of days in the report
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the report has no days
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Format an amount with two decimal places, rounding half away from zero
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}
