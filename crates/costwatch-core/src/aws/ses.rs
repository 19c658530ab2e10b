//! SES mail transport

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ses::error::DisplayErrorContext;
use aws_sdk_ses::primitives::Blob;
use aws_sdk_ses::types::RawMessage;
use aws_sdk_ses::Client;

use crate::alerting::MailTransport;
use crate::error::{Error, Result};

/// [`MailTransport`] backed by SES `SendRawEmail`
#[derive(Clone)]
pub struct SesTransport {
    client: Client,
}

impl SesTransport {
    /// Create a transport from shared SDK configuration
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl MailTransport for SesTransport {
    async fn send_raw(&self, message: Vec<u8>) -> Result<String> {
        let raw = RawMessage::builder()
            .data(Blob::new(message))
            .build()
            .map_err(|e| Error::email(e.to_string()))?;

        let output = self
            .client
            .send_raw_email()
            .raw_message(raw)
            .send()
            .await
            .map_err(|e| Error::email(DisplayErrorContext(&e).to_string()))?;

        Ok(output.message_id().to_string())
    }
}
