//! Alerting for costwatch
//!
//! The threshold gate decides which reporters run. Reporters are best-effort:
//! each returns a [`NotificationResult`] instead of failing the run.

mod email;
mod notifier;
mod threshold;

pub use email::{EmailNotifier, MailTransport, ObjectStore};
pub use notifier::{Channel, ChatNotifier, NotificationError, NotificationResult, NotificationStatus};
pub use threshold::{GateDecision, ThresholdGate};

#[cfg(test)]
pub(crate) use email::testing;
