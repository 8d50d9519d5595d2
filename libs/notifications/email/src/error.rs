//! Error types for outbound email.

use thiserror::Error;

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// Missing or invalid mail settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Recipient or sender could not be parsed as a mailbox
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Template error: {0}")]
    Template(String),

    /// Relay rejected the message, was unreachable, or timed out
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl From<core_config::ConfigError> for NotificationError {
    fn from(err: core_config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
