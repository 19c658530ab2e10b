//! Threshold gate

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::AlertingConfig;

/// Which reporters a total lets through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateDecision {
    /// Total is strictly above the threshold
    pub exceeded: bool,
    /// Chat summary should be posted
    pub chat: bool,
    /// Email alert should be sent
    pub email: bool,
}

/// Compares a total against the configured threshold
#[derive(Debug, Clone)]
pub struct ThresholdGate {
    threshold: Decimal,
    gate_chat: bool,
}

impl ThresholdGate {
    /// Create a gate; with `gate_chat` unset the chat summary is unconditional
    pub fn new(threshold: Decimal, gate_chat: bool) -> Self {
        Self {
            threshold,
            gate_chat,
        }
    }

    /// Gate built from alerting configuration
    pub fn from_config(config: &AlertingConfig) -> Self {
        Self::new(config.cost_threshold, config.gate_chat)
    }

    /// Configured threshold
    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// Whether `total` exceeds the threshold
    pub fn exceeds(&self, total: Decimal) -> bool {
        total > self.threshold
    }

    /// Decide which reporters run for `total`
    pub fn decide(&self, total: Decimal) -> GateDecision {
        let exceeded = self.exceeds(total);
        GateDecision {
            exceeded,
            chat: exceeded || !self.gate_chat,
            email: exceeded,
        }
    }
}
