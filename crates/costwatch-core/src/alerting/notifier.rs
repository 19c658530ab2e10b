//! Notification results and chat delivery

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

use crate::config::ChatConfig;
use crate::error::Result;
use crate::models::CostReport;
use crate::render::format_summary;

/// Reporter a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Chat webhook
    Chat,
    /// Email
    Email,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Chat => f.write_str("chat"),
            Channel::Email => f.write_str("email"),
        }
    }
}

/// What happened to a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Delivered to the provider
    Sent,
    /// Suppressed by the threshold gate
    Skipped,
    /// Attempted and failed
    Failed,
}

/// Result of sending a notification
#[derive(Debug, Clone, Serialize)]
pub struct NotificationResult {
    /// Reporter that produced this result
    pub channel: Channel,
    /// Outcome
    pub status: NotificationStatus,
    /// Error message for failed notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Provider reference, e.g. the email message id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// When the attempt finished
    pub sent_at: DateTime<Utc>,
}

impl NotificationResult {
    /// Successful delivery
    pub fn sent(channel: Channel, reference: Option<String>) -> Self {
        Self {
            channel,
            status: NotificationStatus::Sent,
            error: None,
            reference,
            sent_at: Utc::now(),
        }
    }

    /// Reporter did not run
    pub fn skipped(channel: Channel) -> Self {
        Self {
            channel,
            status: NotificationStatus::Skipped,
            error: None,
            reference: None,
            sent_at: Utc::now(),
        }
    }

    /// Failed delivery; logs the error
    pub fn failed(channel: Channel, err: impl fmt::Display) -> Self {
        let message = err.to_string();
        error!(channel = %channel, error = %message, "Notification failed");
        Self {
            channel,
            status: NotificationStatus::Failed,
            error: Some(message),
            reference: None,
            sent_at: Utc::now(),
        }
    }

    /// Whether the notification was delivered
    pub fn success(&self) -> bool {
        self.status == NotificationStatus::Sent
    }
}

/// Notification errors
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Request failed or returned a non-2xx status
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Reporter is missing a setting it needs
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Message could not be built
    #[error("Render error: {0}")]
    RenderError(String),

    /// Provider rejected the message
    #[error("Delivery error: {0}")]
    DeliveryError(String),
}

impl From<crate::error::Error> for NotificationError {
    fn from(err: crate::error::Error) -> Self {
        NotificationError::RenderError(err.to_string())
    }
}

// Chat webhook payload
#[derive(Debug, Serialize)]
struct ChatPayload<'a> {
    text: &'a str,
}

/// Posts the plain-text summary to a chat webhook
pub struct ChatNotifier {
    client: Client,
    webhook_url: String,
}

impl ChatNotifier {
    /// Create a chat notifier
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            webhook_url: config.webhook_url.clone(),
        })
    }

    /// Post the summary; failures are captured, never returned
    pub async fn notify(&self, report: &CostReport) -> NotificationResult {
        match self.send(&format_summary(report)).await {
            Ok(()) => NotificationResult::sent(Channel::Chat, None),
            Err(e) => NotificationResult::failed(Channel::Chat, e),
        }
    }

    async fn send(&self, text: &str) -> std::result::Result<(), NotificationError> {
        if self.webhook_url.is_empty() {
            return Err(NotificationError::ConfigError(
                "chat.webhook_url is not set".to_string(),
            ));
        }

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&ChatPayload { text })
            .send()
            .await
            .map_err(|e| NotificationError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::HttpError(format!(
                "Webhook returned {}: {}",
                status, body
            )));
        }

        info!("Chat notification sent");
        Ok(())
    }
}
