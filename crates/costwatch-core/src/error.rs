//! Error types for costwatch

use thiserror::Error;

/// Result type alias using costwatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for costwatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Billing provider call failed
    #[error("Billing provider error: {0}")]
    Billing(String),

    /// A billing entry could not be turned into a cost record
    #[error("Failed to parse cost for {date}: {reason}")]
    Parse {
        /// Start date of the offending entry
        date: String,
        /// What was wrong with the amount
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Object storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Email assembly or delivery error
    #[error("Email error: {0}")]
    Email(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a parse error for the entry starting on `date`
    pub fn parse(date: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            date: date.into(),
            reason: reason.into(),
        }
    }

    /// Create a billing error
    pub fn billing(msg: impl Into<String>) -> Self {
        Self::Billing(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an email error
    pub fn email(msg: impl Into<String>) -> Self {
        Self::Email(msg.into())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
