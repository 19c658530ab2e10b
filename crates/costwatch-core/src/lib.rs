//! # costwatch
//!
//! Scheduled cloud cost report with chat and email alerts.
//!
//! Each run queries the billing provider for the previous month's daily spend,
//! totals it, always posts a summary to a chat webhook and, when the total is
//! above the configured threshold, emails a branded alert with the daily costs
//! attached as CSV.
//!
//! ## Architecture
//!
//! - **Billing**: reads daily costs and aggregates them into a report
//! - **Alerting**: threshold gate plus chat and email reporters
//! - **Render**: chat text, CSV attachment, HTML body
//! - **AWS**: Cost Explorer, S3 and SES behind the billing/storage/mail traits
//!
//! ## Quick Start
//!
//! ```bash
//! # Run once (e.g. from cron or a scheduled container task)
//! COSTWATCH_CHAT__WEBHOOK_URL=https://hooks.example.com/... costwatch run
//!
//! # Print last month's report without notifying anyone
//! costwatch report --format csv
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod aws;
pub mod billing;
pub mod config;
pub mod error;
pub mod job;
pub mod models;
pub mod render;

pub use config::Config;
pub use error::{Error, Result};
pub use job::{CostReportJob, InvocationOutcome};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{NotificationResult, ThresholdGate};
    pub use crate::billing::{Aggregator, BillingReader, BillingSource};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::job::{CostReportJob, InvocationOutcome};
    pub use crate::models::*;
}
