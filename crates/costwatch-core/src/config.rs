//! Configuration management for costwatch
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `COSTWATCH_`-prefixed environment variables (`__` separates sections, e.g.
//! `COSTWATCH_ALERTING__COST_THRESHOLD=25`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "COSTWATCH";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Billing provider configuration
    pub billing: BillingConfig,

    /// Object storage configuration (branding assets)
    pub storage: StorageConfig,

    /// Threshold configuration
    pub alerting: AlertingConfig,

    /// Chat webhook configuration
    pub chat: ChatConfig,

    /// Email configuration
    pub email: EmailConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Config::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run could work with
    pub fn validate(&self) -> Result<()> {
        if self.alerting.cost_threshold.is_sign_negative() {
            return Err(Error::config(format!(
                "alerting.cost_threshold must not be negative (got {})",
                self.alerting.cost_threshold
            )));
        }

        if self.chat.timeout_seconds == 0 {
            return Err(Error::config("chat.timeout_seconds must be greater than 0"));
        }

        for (key, value) in [
            ("email.sender_address", &self.email.sender_address),
            ("email.recipient_address", &self.email.recipient_address),
        ] {
            if !value.is_empty() && !value.contains('@') {
                return Err(Error::config(format!("{key} is not an email address: {value}")));
            }
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(Error::config(format!(
                "logging.format must be \"pretty\" or \"json\" (got {other:?})"
            ))),
        }
    }
}

/// Billing provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Region of the Cost Explorer endpoint
    pub region: String,
    /// Cost metric to query
    pub metric: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            metric: "UnblendedCost".to_string(),
        }
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket holding the logo
    pub bucket_name: String,
    /// Object key of the logo
    pub logo_key: String,
    /// MIME type used for the inlined logo
    pub logo_content_type: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket_name: "costwatch-assets".to_string(),
            logo_key: "logo.png".to_string(),
            logo_content_type: "image/png".to_string(),
        }
    }
}

/// Threshold configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertingConfig {
    /// Total above which the email alert is sent
    pub cost_threshold: Decimal,
    /// Apply the threshold to the chat summary as well
    pub gate_chat: bool,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            cost_threshold: Decimal::new(100, 1),
            gate_chat: false,
        }
    }
}

/// Chat webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Incoming webhook URL
    pub webhook_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            timeout_seconds: 30,
        }
    }
}

/// Email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// From address
    pub sender_address: String,
    /// To address
    pub recipient_address: String,
    /// Region of the email provider
    pub region: String,
    /// Subject line
    pub subject: String,
    /// Banner heading of the HTML body
    pub heading: String,
    /// Salutation line
    pub greeting: String,
    /// Closing line
    pub signature: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender_address: String::new(),
            recipient_address: String::new(),
            region: "us-east-1".to_string(),
            subject: "AWS Account Cost Alert".to_string(),
            heading: "Your AWS Account Cost Alert".to_string(),
            greeting: "Dear Customer,".to_string(),
            signature: "The Costwatch Team".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alerting.cost_threshold, dec!(10.0));
        assert!(!config.alerting.gate_chat);
        assert_eq!(config.billing.metric, "UnblendedCost");
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = Config::default();
        config.alerting.cost_threshold = dec!(-1);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_address_rejected() {
        let mut config = Config::default();
        config.email.recipient_address = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[alerting]
cost_threshold = "42.50"
gate_chat = true

[chat]
webhook_url = "https://chat.example.com/hook"

[email]
sender_address = "billing@example.com"
recipient_address = "ops@example.com"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str()).unwrap();
        assert_eq!(config.alerting.cost_threshold, dec!(42.50));
        assert!(config.alerting.gate_chat);
        assert_eq!(config.chat.webhook_url, "https://chat.example.com/hook");
        assert_eq!(config.email.recipient_address, "ops@example.com");
        // untouched sections keep their defaults
        assert_eq!(config.storage.logo_key, "logo.png");
        assert_eq!(config.chat.timeout_seconds, 30);
    }
}
