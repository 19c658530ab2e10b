//! Cost Explorer billing source

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::{DateInterval, Granularity, ResultByTime};
use aws_sdk_costexplorer::Client;

use crate::billing::{BillingSource, CostPage, CostQuery, DailyCost};
use crate::error::{Error, Result};

/// [`BillingSource`] backed by `GetCostAndUsage`
#[derive(Clone)]
pub struct CostExplorerSource {
    client: Client,
}

impl CostExplorerSource {
    /// Create a source from shared SDK configuration
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl BillingSource for CostExplorerSource {
    async fn daily_costs(&self, query: &CostQuery, page_token: Option<String>) -> Result<CostPage> {
        let interval = DateInterval::builder()
            .start(query.period.start_str())
            .end(query.period.end_str())
            .build()
            .map_err(|e| Error::billing(e.to_string()))?;

        let output = self
            .client
            .get_cost_and_usage()
            .time_period(interval)
            .granularity(Granularity::Daily)
            .metrics(&query.metric)
            .set_next_page_token(page_token)
            .send()
            .await
            .map_err(|e| Error::billing(DisplayErrorContext(&e).to_string()))?;

        let entries = output
            .results_by_time()
            .iter()
            .map(|result| to_daily_cost(result, &query.metric))
            .collect::<Result<Vec<_>>>()?;

        Ok(CostPage {
            entries,
            next_page_token: output.next_page_token().map(str::to_string),
        })
    }
}

fn to_daily_cost(result: &ResultByTime, metric: &str) -> Result<DailyCost> {
    let start = result
        .time_period()
        .map(|period| period.start().to_string())
        .ok_or_else(|| Error::billing("result without a time period"))?;
    let value = result.total().and_then(|total| total.get(metric));

    Ok(DailyCost {
        start,
        amount: value.and_then(|v| v.amount()).map(str::to_string),
        unit: value.and_then(|v| v.unit()).map(str::to_string),
    })
}
