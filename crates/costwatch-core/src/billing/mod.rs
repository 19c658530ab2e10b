//! Billing data retrieval
//!
//! The reader asks a [`BillingSource`] for daily costs over the previous
//! month; the aggregator turns those raw entries into a [`CostReport`].
//! Errors here are never swallowed: a report built on missing or malformed
//! billing data is worse than no report.
//!
//! [`CostReport`]: crate::models::CostReport

mod aggregate;

pub use aggregate::Aggregator;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::BillingPeriod;

/// Provider-native cost for one day, amount still unparsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCost {
    /// Start of the provider's time period (`YYYY-MM-DD`)
    pub start: String,
    /// Amount exactly as returned by the provider
    pub amount: Option<String>,
    /// Currency unit, if the provider reported one
    pub unit: Option<String>,
}

/// One cost-and-usage query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuery {
    /// Date range to query
    pub period: BillingPeriod,
    /// Metric name, e.g. `UnblendedCost`
    pub metric: String,
}

/// One page of query results
#[derive(Debug, Clone, Default)]
pub struct CostPage {
    /// Entries in provider order
    pub entries: Vec<DailyCost>,
    /// Token for the next page, if any
    pub next_page_token: Option<String>,
}

/// Source of daily cost data
#[async_trait]
pub trait BillingSource: Send + Sync {
    /// Fetch one page of daily costs at DAILY granularity
    async fn daily_costs(&self, query: &CostQuery, page_token: Option<String>) -> Result<CostPage>;
}

/// Reads the previous month's daily costs
pub struct BillingReader<S> {
    source: S,
    metric: String,
}

impl<S: BillingSource> BillingReader<S> {
    /// Create a reader for `metric`
    pub fn new(source: S, metric: impl Into<String>) -> Self {
        Self {
            source,
            metric: metric.into(),
        }
    }

    /// Fetch all daily entries for the period ending before `now`
    pub async fn fetch(&self, now: DateTime<Utc>) -> Result<(BillingPeriod, Vec<DailyCost>)> {
        let period = BillingPeriod::ending_before(now)?;
        let query = CostQuery {
            period,
            metric: self.metric.clone(),
        };

        info!(period = %period, metric = %self.metric, "Querying billing provider");

        let mut entries = Vec::new();
        let mut page_token = None;
        loop {
            let page = self.source.daily_costs(&query, page_token).await?;
            debug!(entries = page.entries.len(), more = page.next_page_token.is_some(), "Received billing page");
            entries.extend(page.entries);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        info!(days = entries.len(), "Billing data retrieved");
        Ok((period, entries))
    }
}
