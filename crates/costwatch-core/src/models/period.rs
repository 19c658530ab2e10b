//! Billing period derived from the invocation time

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Date format the billing provider expects
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar range queried from the billing provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    /// First day of the month before the invocation month
    pub start: NaiveDate,
    /// The day before the invocation
    pub end: NaiveDate,
}

impl BillingPeriod {
    /// Period for a run at `now` (UTC): first day of the previous month
    /// through yesterday.
    pub fn ending_before(now: DateTime<Utc>) -> Result<Self> {
        let today = now.date_naive();

        let start = today
            .with_day(1)
            .and_then(|first| first.checked_sub_months(Months::new(1)))
            .ok_or_else(|| Error::billing(format!("no previous month for {today}")))?;
        let end = today
            .pred_opt()
            .ok_or_else(|| Error::billing(format!("no day before {today}")))?;

        Ok(Self { start, end })
    }

    /// Start date as the provider's `YYYY-MM-DD` string
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date as the provider's `YYYY-MM-DD` string
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_str(), self.end_str())
    }
}
