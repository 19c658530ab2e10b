//! Email alert: CSV attachment, branded HTML body, raw MIME submission

use async_trait::async_trait;
use bytes::Bytes;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use tracing::{debug, info, warn};

use super::notifier::{Channel, NotificationError, NotificationResult};
use crate::config::{EmailConfig, StorageConfig};
use crate::error::Result;
use crate::models::CostReport;
use crate::render::{total_line, AlertTemplate, CsvExporter, Logo};

/// File name of the CSV attachment
pub const ATTACHMENT_NAME: &str = "cost_data.csv";

/// Read-only object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full contents of `bucket`/`key`
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;
}

/// Raw MIME message submission
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send a formatted message, returning the provider's message id
    async fn send_raw(&self, message: Vec<u8>) -> Result<String>;
}

/// Sends the cost alert email
pub struct EmailNotifier<S, T> {
    store: S,
    transport: T,
    storage: StorageConfig,
    email: EmailConfig,
    template: AlertTemplate,
    exporter: CsvExporter,
}

impl<S: ObjectStore, T: MailTransport> EmailNotifier<S, T> {
    /// Create an email notifier
    pub fn new(store: S, transport: T, storage: StorageConfig, email: EmailConfig) -> Self {
        let template = AlertTemplate::from_config(&email);
        Self {
            store,
            transport,
            storage,
            email,
            template,
            exporter: CsvExporter::new(),
        }
    }

    /// Build and send the alert; failures are captured, never returned
    pub async fn notify(&self, report: &CostReport) -> NotificationResult {
        match self.send(report).await {
            Ok(message_id) => NotificationResult::sent(Channel::Email, Some(message_id)),
            Err(e) => NotificationResult::failed(Channel::Email, e),
        }
    }

    async fn send(&self, report: &CostReport) -> std::result::Result<String, NotificationError> {
        let (from, to) = self.mailboxes()?;

        let csv = self.render_csv(report)?;
        let logo = self.fetch_logo().await;
        let html = self.template.render(&total_line(report.total()), logo.as_ref());
        let raw = self.compose(from, to, html, csv)?;

        debug!(bytes = raw.len(), "Submitting email");
        let message_id = self
            .transport
            .send_raw(raw)
            .await
            .map_err(|e| NotificationError::DeliveryError(e.to_string()))?;

        info!(message_id = %message_id, recipient = %self.email.recipient_address, "Email sent");
        Ok(message_id)
    }

    fn mailboxes(&self) -> std::result::Result<(Mailbox, Mailbox), NotificationError> {
        let parse = |key: &str, value: &str| {
            if value.is_empty() {
                return Err(NotificationError::ConfigError(format!("{key} is not set")));
            }
            value
                .parse::<Mailbox>()
                .map_err(|e| NotificationError::ConfigError(format!("{key}: {e}")))
        };

        Ok((
            parse("email.sender_address", &self.email.sender_address)?,
            parse("email.recipient_address", &self.email.recipient_address)?,
        ))
    }

    /// Write the CSV to a temporary file and read it back as attachment bytes
    fn render_csv(&self, report: &CostReport) -> Result<Vec<u8>> {
        let file = self.exporter.to_temp_file(report)?;
        let data = std::fs::read(file.path())?;
        debug!(path = %file.path().display(), rows = report.len(), "Rendered CSV attachment");
        Ok(data)
    }

    /// Missing branding degrades the email rather than blocking it
    async fn fetch_logo(&self) -> Option<Logo> {
        let bucket = &self.storage.bucket_name;
        let key = &self.storage.logo_key;

        match self.store.get_object(bucket, key).await {
            Ok(data) => Some(Logo {
                data,
                content_type: self.storage.logo_content_type.clone(),
            }),
            Err(e) => {
                warn!(bucket = %bucket, key = %key, error = %e, "Logo unavailable, sending unbranded email");
                None
            }
        }
    }

    fn compose(
        &self,
        from: Mailbox,
        to: Mailbox,
        html: String,
        csv: Vec<u8>,
    ) -> std::result::Result<Vec<u8>, NotificationError> {
        let csv_type = ContentType::parse("text/csv")
            .map_err(|e| NotificationError::RenderError(e.to_string()))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.email.subject.as_str())
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(html))
                    .singlepart(Attachment::new(ATTACHMENT_NAME.to_string()).body(csv, csv_type)),
            )
            .map_err(|e| NotificationError::RenderError(e.to_string()))?;

        Ok(message.formatted())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::alerting::NotificationStatus;
    use crate::models::CostRecord;
    use rust_decimal_macros::dec;

    fn report() -> CostReport {
        CostReport::new(vec![
            CostRecord::new("2024-02-01", dec!(7.25)),
            CostRecord::new("2024-02-02", dec!(5.00)),
        ])
    }

    #[tokio::test]
    async fn test_sends_multipart_message() {
        let store = MemoryStore::with(b"\x89PNG");
        let transport = RecordingTransport::default();
        let notifier = EmailNotifier::new(
            store.clone(),
            transport.clone(),
            StorageConfig::default(),
            email_config(),
        );

        let result = notifier.notify(&report()).await;

        assert!(result.success());
        assert_eq!(result.reference.as_deref(), Some("msg-1"));
        assert_eq!(
            store.requests.lock().unwrap().as_slice(),
            &[("costwatch-assets".to_string(), "logo.png".to_string())]
        );

        let messages = transport.messages();
        assert_eq!(messages.len(), 1);
        let raw = &messages[0];
        assert!(raw.contains("From: billing@example.com"));
        assert!(raw.contains("To: ops@example.com"));
        assert!(raw.contains("Subject: AWS Account Cost Alert"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("text/csv"));
        assert!(raw.contains(ATTACHMENT_NAME));
    }

    #[tokio::test]
    async fn test_missing_logo_still_sends() {
        let transport = RecordingTransport::default();
        let notifier = EmailNotifier::new(
            MemoryStore::default(),
            transport.clone(),
            StorageConfig::default(),
            email_config(),
        );

        let result = notifier.notify(&report()).await;

        assert!(result.success());
        assert_eq!(transport.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_is_captured() {
        let notifier = EmailNotifier::new(
            MemoryStore::default(),
            RecordingTransport::failing(),
            StorageConfig::default(),
            email_config(),
        );

        let result = notifier.notify(&report()).await;

        assert_eq!(result.status, NotificationStatus::Failed);
        assert!(result.error.unwrap().contains("MessageRejected"));
    }

    #[tokio::test]
    async fn test_missing_recipient_is_config_failure() {
        let transport = RecordingTransport::default();
        let notifier = EmailNotifier::new(
            MemoryStore::default(),
            transport.clone(),
            StorageConfig::default(),
            EmailConfig::default(),
        );

        let result = notifier.notify(&report()).await;

        assert_eq!(result.status, NotificationStatus::Failed);
        assert!(result.error.unwrap().contains("email.sender_address"));
        assert!(transport.messages().is_empty());
    }

    #[test]
    fn test_csv_attachment_bytes() {
        let notifier = EmailNotifier::new(
            MemoryStore::default(),
            RecordingTransport::default(),
            StorageConfig::default(),
            email_config(),
        );

        let csv = notifier.render_csv(&report()).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Time,Cost\n2024-02-01,7.25\n2024-02-02,5.00\n"
        );
    }
}
