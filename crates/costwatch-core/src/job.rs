//! One invocation of the cost report
//!
//! fetch → aggregate → gate → notify, strictly in that order. Billing and
//! aggregation errors fail the run; reporter errors only show up in the
//! returned [`InvocationOutcome`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};

use crate::alerting::{
    Channel, ChatNotifier, EmailNotifier, MailTransport, NotificationResult, ObjectStore,
    ThresholdGate,
};
use crate::billing::{Aggregator, BillingReader, BillingSource};
use crate::config::Config;
use crate::error::Result;
use crate::models::{BillingPeriod, CostReport};

/// Confirmation string returned by every successful run
pub const CONFIRMATION: &str = "Cost data retrieved and notifications sent if needed";

/// Result of a successful invocation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationOutcome {
    /// Always 200
    pub status_code: u16,
    /// Fixed confirmation string
    pub body: String,
    /// Period that was queried
    pub period: BillingPeriod,
    /// Total over the period
    pub total: Decimal,
    /// Configured threshold
    pub threshold: Decimal,
    /// Whether the total exceeded the threshold
    pub threshold_exceeded: bool,
    /// One entry per reporter, in the order they ran
    pub notifications: Vec<NotificationResult>,
}

/// The scheduled cost report job
pub struct CostReportJob<B, S, T> {
    reader: BillingReader<B>,
    aggregator: Aggregator,
    gate: ThresholdGate,
    chat: ChatNotifier,
    email: EmailNotifier<S, T>,
}

impl<B, S, T> CostReportJob<B, S, T>
where
    B: BillingSource,
    S: ObjectStore,
    T: MailTransport,
{
    /// Wire the job from configuration and the three provider seams
    pub fn new(config: &Config, billing: B, store: S, transport: T) -> Result<Self> {
        Ok(Self {
            reader: BillingReader::new(billing, config.billing.metric.clone()),
            aggregator: Aggregator::new(),
            gate: ThresholdGate::from_config(&config.alerting),
            chat: ChatNotifier::new(&config.chat)?,
            email: EmailNotifier::new(
                store,
                transport,
                config.storage.clone(),
                config.email.clone(),
            ),
        })
    }

    /// Run against the current time
    pub async fn run(&self) -> Result<InvocationOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Run as if invoked at `now`
    #[instrument(skip(self))]
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<InvocationOutcome> {
        let (period, report) = self.report_at(now).await?;

        let decision = self.gate.decide(report.total());
        info!(
            total = %report.total(),
            threshold = %self.gate.threshold(),
            exceeded = decision.exceeded,
            "Threshold evaluated"
        );

        let mut notifications = Vec::with_capacity(2);

        notifications.push(if decision.chat {
            self.chat.notify(&report).await
        } else {
            NotificationResult::skipped(Channel::Chat)
        });

        notifications.push(if decision.email {
            self.email.notify(&report).await
        } else {
            NotificationResult::skipped(Channel::Email)
        });

        Ok(InvocationOutcome {
            status_code: 200,
            body: CONFIRMATION.to_string(),
            period,
            total: report.total(),
            threshold: self.gate.threshold(),
            threshold_exceeded: decision.exceeded,
            notifications,
        })
    }

    /// Fetch and aggregate without notifying anyone
    pub async fn report_at(&self, now: DateTime<Utc>) -> Result<(BillingPeriod, CostReport)> {
        let (period, entries) = self.reader.fetch(now).await?;
        let report = self.aggregator.aggregate(&entries)?;
        Ok((period, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerting::testing::{email_config, MemoryStore, RecordingTransport};
    use crate::alerting::NotificationStatus;
    use crate::billing::testing::{entry, StaticBillingSource};
    use crate::error::Error;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap()
    }

    fn config(webhook_url: String) -> Config {
        let mut config = Config::default();
        config.chat.webhook_url = webhook_url;
        config.chat.timeout_seconds = 5;
        config.email = email_config();
        config
    }

    async fn chat_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        server
    }

    fn statuses(outcome: &InvocationOutcome) -> Vec<(Channel, NotificationStatus)> {
        outcome
            .notifications
            .iter()
            .map(|n| (n.channel, n.status))
            .collect()
    }

    #[tokio::test]
    async fn test_below_threshold_posts_chat_only() {
        let server = chat_server().await;
        let transport = RecordingTransport::default();
        let job = CostReportJob::new(
            &config(server.uri()),
            StaticBillingSource::single(vec![entry("2024-02-01", "4.99"), entry("2024-02-02", "5.00")]),
            MemoryStore::with(b"logo"),
            transport.clone(),
        )
        .unwrap();

        let outcome = job.run_at(now()).await.unwrap();

        assert_eq!(outcome.total, dec!(9.99));
        assert!(!outcome.threshold_exceeded);
        assert_eq!(
            statuses(&outcome),
            vec![
                (Channel::Chat, NotificationStatus::Sent),
                (Channel::Email, NotificationStatus::Skipped),
            ]
        );
        assert!(transport.messages().is_empty());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_above_threshold_posts_chat_and_email() {
        let server = chat_server().await;
        let transport = RecordingTransport::default();
        let job = CostReportJob::new(
            &config(server.uri()),
            StaticBillingSource::single(vec![entry("2024-02-01", "5.01"), entry("2024-02-02", "5.00")]),
            MemoryStore::with(b"logo"),
            transport.clone(),
        )
        .unwrap();

        let outcome = job.run_at(now()).await.unwrap();

        assert_eq!(outcome.total, dec!(10.01));
        assert!(outcome.threshold_exceeded);
        assert_eq!(
            statuses(&outcome),
            vec![
                (Channel::Chat, NotificationStatus::Sent),
                (Channel::Email, NotificationStatus::Sent),
            ]
        );
        assert_eq!(transport.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_reporter_failures_do_not_fail_the_run() {
        let job = CostReportJob::new(
            &config("http://127.0.0.1:1/hook".to_string()),
            StaticBillingSource::single(vec![entry("2024-02-01", "25.00")]),
            MemoryStore::default(),
            RecordingTransport::failing(),
        )
        .unwrap();

        let outcome = job.run_at(now()).await.unwrap();

        assert_eq!(outcome.status_code, 200);
        assert_eq!(outcome.body, CONFIRMATION);
        assert_eq!(
            statuses(&outcome),
            vec![
                (Channel::Chat, NotificationStatus::Failed),
                (Channel::Email, NotificationStatus::Failed),
            ]
        );
    }

    #[tokio::test]
    async fn test_logo_failure_still_sends_email() {
        let server = chat_server().await;
        let transport = RecordingTransport::default();
        let job = CostReportJob::new(
            &config(server.uri()),
            StaticBillingSource::single(vec![entry("2024-02-01", "25.00")]),
            MemoryStore::default(),
            transport.clone(),
        )
        .unwrap();

        let outcome = job.run_at(now()).await.unwrap();

        assert!(outcome.notifications.iter().all(NotificationResult::success));
        assert_eq!(transport.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_billing_data_fails_the_run() {
        let server = chat_server().await;
        let transport = RecordingTransport::default();
        let job = CostReportJob::new(
            &config(server.uri()),
            StaticBillingSource::single(vec![entry("2024-02-01", "12.00"), entry("2024-02-02", "abc")]),
            MemoryStore::default(),
            transport.clone(),
        )
        .unwrap();

        let err = job.run_at(now()).await.unwrap_err();

        assert!(matches!(err, Error::Parse { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
        assert!(transport.messages().is_empty());
    }

    #[tokio::test]
    async fn test_billing_error_fails_the_run() {
        let server = chat_server().await;
        let job = CostReportJob::new(
            &config(server.uri()),
            StaticBillingSource::failing(),
            MemoryStore::default(),
            RecordingTransport::default(),
        )
        .unwrap();

        assert!(matches!(job.run_at(now()).await, Err(Error::Billing(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gated_chat_is_skipped_below_threshold() {
        let server = chat_server().await;
        let mut config = config(server.uri());
        config.alerting.gate_chat = true;
        let job = CostReportJob::new(
            &config,
            StaticBillingSource::single(vec![entry("2024-02-01", "1.00")]),
            MemoryStore::default(),
            RecordingTransport::default(),
        )
        .unwrap();

        let outcome = job.run_at(now()).await.unwrap();

        assert_eq!(
            statuses(&outcome),
            vec![
                (Channel::Chat, NotificationStatus::Skipped),
                (Channel::Email, NotificationStatus::Skipped),
            ]
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_outcome_serializes_like_a_handler_response() {
        let server = chat_server().await;
        let job = CostReportJob::new(
            &config(server.uri()),
            StaticBillingSource::single(vec![entry("2024-02-01", "1.00")]),
            MemoryStore::default(),
            RecordingTransport::default(),
        )
        .unwrap();

        let outcome = job.run_at(now()).await.unwrap();
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], CONFIRMATION);
        assert_eq!(json["thresholdExceeded"], false);
        assert_eq!(json["notifications"].as_array().unwrap().len(), 2);
    }
}
