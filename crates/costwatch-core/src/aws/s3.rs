//! S3 object store

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::alerting::ObjectStore;
use crate::error::{Error, Result};

/// [`ObjectStore`] backed by S3 `GetObject`
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Create a store from shared SDK configuration
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::storage(format!("s3://{bucket}/{key}: {}", DisplayErrorContext(&e))))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| Error::storage(format!("s3://{bucket}/{key}: {e}")))?;

        Ok(body.into_bytes())
    }
}
