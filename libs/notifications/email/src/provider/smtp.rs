//! SMTP email provider using lettre

use super::{EmailProvider, SendResult};
use crate::error::NotificationError;
use crate::models::Email;
use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};
use eyre::{Result, WrapErr};
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    /// Port 465 uses implicit TLS, any other port upgrades with STARTTLS.
    /// When false the connection is plaintext (Mailpit and similar).
    pub use_tls: bool,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("use_tls", &self.use_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SmtpConfig {
    pub fn from_mailbox(&self) -> std::result::Result<Mailbox, NotificationError> {
        format!("\"{}\" <{}>", self.from_name, self.from_email)
            .parse()
            .map_err(|e| NotificationError::InvalidAddress(format!("from address: {e}")))
    }
}

/// Environment variables:
/// - `SMTP_HOST` (`smtp.gmail.com`), `SMTP_PORT` (587)
/// - `SMTP_USERNAME` / `SMTP_PASSWORD`, falling back to
///   `NODE_MAILER_USER` / `NODE_MAILER_PASSWORD`
/// - `SMTP_USE_TLS` (true), `SMTP_TIMEOUT_SECS` (10)
/// - `EMAIL_FROM_ADDRESS` (`support@airdnd.ai`), `EMAIL_FROM_NAME` (`AirDND event booked`)
impl FromEnv for SmtpConfig {
    fn from_env() -> std::result::Result<Self, ConfigError> {
        let username = std::env::var("SMTP_USERNAME")
            .or_else(|_| std::env::var("NODE_MAILER_USER"))
            .unwrap_or_default();
        let password = std::env::var("SMTP_PASSWORD")
            .or_else(|_| std::env::var("NODE_MAILER_PASSWORD"))
            .unwrap_or_default();

        Ok(Self {
            host: env_or_default("SMTP_HOST", "smtp.gmail.com"),
            port: env_parse_or("SMTP_PORT", 587)?,
            username,
            password,
            from_email: env_or_default("EMAIL_FROM_ADDRESS", "support@airdnd.ai"),
            from_name: env_or_default("EMAIL_FROM_NAME", "AirDND event booked"),
            use_tls: env_parse_or("SMTP_USE_TLS", true)?,
            timeout_secs: env_parse_or("SMTP_TIMEOUT_SECS", 10)?,
        })
    }
}

pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    config: Arc<SmtpConfig>,
}

impl SmtpProvider {
    pub fn new(config: SmtpConfig) -> std::result::Result<Self, NotificationError> {
        let from = config.from_mailbox()?;

        let builder = if config.use_tls && config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        } else {
            Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host))
        }
        .map_err(|e| NotificationError::Config(format!("SMTP relay {}: {e}", config.host)))?
        .port(config.port)
        .timeout(Some(Duration::from_secs(config.timeout_secs)));

        let transport = if config.username.is_empty() {
            builder.build()
        } else {
            builder
                .credentials(Credentials::new(
                    config.username.clone(),
                    config.password.clone(),
                ))
                .build()
        };

        tracing::info!(
            host = %config.host,
            port = config.port,
            tls = config.use_tls,
            authenticated = !config.username.is_empty(),
            "SMTP transport configured"
        );

        Ok(Self {
            transport,
            from,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn build_message(&self, email: &Email) -> Result<Message> {
        let to: Mailbox = email.to.parse().wrap_err("Invalid to address")?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject);

        let message = match (&email.body_text, &email.body_html) {
            (Some(text), Some(html)) => builder
                .multipart(
                    MultiPart::alternative()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_PLAIN)
                                .body(text.clone()),
                        )
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_HTML)
                                .body(html.clone()),
                        ),
                )
                .wrap_err("Failed to build multipart message")?,
            (Some(text), None) => builder
                .header(ContentType::TEXT_PLAIN)
                .body(text.clone())
                .wrap_err("Failed to build text message")?,
            (None, Some(html)) => builder
                .header(ContentType::TEXT_HTML)
                .body(html.clone())
                .wrap_err("Failed to build HTML message")?,
            (None, None) => eyre::bail!("Email must have either text or HTML body"),
        };

        Ok(message)
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &Email) -> Result<SendResult> {
        let message = self.build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .wrap_err("Failed to send email via SMTP")?;

        let message_id = response
            .message()
            .next()
            .map(|s| s.to_string())
            .unwrap_or_else(|| email.id.clone());

        tracing::info!(email_id = %email.id, to = %email.to, "Email sent via SMTP");

        Ok(SendResult { message_id })
    }

    async fn health_check(&self) -> Result<()> {
        let ok = self
            .transport
            .test_connection()
            .await
            .wrap_err("SMTP health check failed")?;
        if !ok {
            eyre::bail!("SMTP server did not accept NOOP");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
