//! Turns provider entries into a cost report

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use super::DailyCost;
use crate::error::{Error, Result};
use crate::models::{CostRecord, CostReport};

/// Converts raw daily entries into [`CostReport`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self
    }

    /// Parse every entry; one bad amount fails the whole report
    pub fn aggregate(&self, entries: &[DailyCost]) -> Result<CostReport> {
        let records = entries
            .iter()
            .map(Self::parse_entry)
            .collect::<Result<Vec<_>>>()?;

        let report = CostReport::new(records);
        debug!(days = report.len(), total = %report.total(), "Aggregated cost report");
        Ok(report)
    }

    fn parse_entry(entry: &DailyCost) -> Result<CostRecord> {
        let raw = entry
            .amount
            .as_deref()
            .ok_or_else(|| Error::parse(&entry.start, "missing amount"))?;

        // Cost Explorer occasionally returns exponent notation for tiny amounts
        let cost = Decimal::from_str(raw.trim())
            .or_else(|_| Decimal::from_scientific(raw.trim()))
            .map_err(|_| Error::parse(&entry.start, format!("not a decimal: {raw:?}")))?;

        // credits and refunds come back as negative amounts
        if cost.is_sign_negative() && !cost.is_zero() {
            debug!(date = %entry.start, amount = %cost, "Credit in billing data");
        }

        Ok(CostRecord::new(entry.start.clone(), cost))
    }
}
