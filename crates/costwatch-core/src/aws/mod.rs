//! AWS-backed implementations of the billing, storage and mail seams
//!
//! Each client is built from the default credential chain; only the region
//! comes from [`Config`].

mod cost_explorer;
mod s3;
mod ses;

pub use cost_explorer::CostExplorerSource;
pub use s3::S3ObjectStore;
pub use ses::SesTransport;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use tracing::debug;

use crate::config::Config;

/// Shared SDK configuration pinned to `region`
pub async fn sdk_config(region: &str) -> SdkConfig {
    debug!(region, "Loading AWS configuration");
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// The three AWS clients a run needs
pub struct AwsBackends {
    /// Cost Explorer, in the billing region
    pub billing: CostExplorerSource,
    /// S3, in the default region
    pub storage: S3ObjectStore,
    /// SES, in the email region
    pub mail: SesTransport,
}

impl AwsBackends {
    /// Build all clients from configuration
    pub async fn from_config(config: &Config) -> Self {
        let billing = sdk_config(&config.billing.region).await;
        let storage = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mail = sdk_config(&config.email.region).await;

        Self {
            billing: CostExplorerSource::new(&billing),
            storage: S3ObjectStore::new(&storage),
            mail: SesTransport::new(&mail),
        }
    }
}
