//! Email provider implementations

pub mod mock;
pub mod smtp;

pub use mock::MockSmtpProvider;
pub use smtp::{SmtpConfig, SmtpProvider};

use crate::models::Email;
use async_trait::async_trait;
use core_config::ConfigError;
use eyre::Result;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SendResult {
    /// Provider-specific message id
    pub message_id: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &Email) -> Result<SendResult>;

    async fn health_check(&self) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// Provider selected by `EMAIL_PROVIDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailProviderKind {
    #[default]
    Smtp,
    /// Captures messages in memory; for local runs without a relay
    Mock,
}

impl FromStr for EmailProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "mock" => Ok(Self::Mock),
            other => Err(format!("unknown email provider '{other}', expected smtp or mock")),
        }
    }
}

impl EmailProviderKind {
    pub fn from_env() -> Result<Self, ConfigError> {
        core_config::env_parse_or("EMAIL_PROVIDER", Self::Smtp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("SMTP".parse::<EmailProviderKind>(), Ok(EmailProviderKind::Smtp));
        assert_eq!(" mock ".parse::<EmailProviderKind>(), Ok(EmailProviderKind::Mock));
        assert!("sendgrid".parse::<EmailProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_from_env() {
        temp_env::with_var_unset("EMAIL_PROVIDER", || {
            assert_eq!(EmailProviderKind::from_env().unwrap(), EmailProviderKind::Smtp);
        });
        temp_env::with_var("EMAIL_PROVIDER", Some("mock"), || {
            assert_eq!(EmailProviderKind::from_env().unwrap(), EmailProviderKind::Mock);
        });
        temp_env::with_var("EMAIL_PROVIDER", Some("carrier-pigeon"), || {
            assert!(EmailProviderKind::from_env().is_err());
        });
    }
}
