//! Event-joined confirmation email.

use crate::error::{NotificationError, NotificationResult};
use crate::models::Email;
use crate::provider::{EmailProvider, SendResult};
use crate::templates::{TemplateEngine, EVENT_JOINED};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Template data for the confirmation. Keys match the template variables.
#[derive(Debug, Clone, Serialize)]
pub struct JoinConfirmation {
    #[serde(skip)]
    pub to_email: String,
    #[serde(rename = "name")]
    pub recipient_name: String,
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "eventDate")]
    pub event_date: String,
    #[serde(rename = "eventTime")]
    pub event_time: String,
}

/// Sends the "Event booked" email through the configured provider.
#[derive(Clone)]
pub struct JoinNotifier {
    provider: Arc<dyn EmailProvider>,
    templates: Arc<TemplateEngine>,
}

impl JoinNotifier {
    pub fn new(provider: Arc<dyn EmailProvider>, templates: Arc<TemplateEngine>) -> Self {
        Self {
            provider,
            templates,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Renders and sends one message. Not retried; any provider failure
    /// becomes [`NotificationError::Delivery`].
    #[instrument(skip(self, confirmation), fields(provider = self.provider.name()))]
    pub async fn send_join_confirmation(
        &self,
        confirmation: &JoinConfirmation,
    ) -> NotificationResult<SendResult> {
        let rendered = self.templates.render(EVENT_JOINED, confirmation)?;

        let mut email = Email::new(&confirmation.to_email, rendered.subject);
        email.body_text = rendered.body_text;
        email.body_html = rendered.body_html;

        match self.provider.send(&email).await {
            Ok(result) => {
                tracing::info!(
                    email_id = %email.id,
                    message_id = %result.message_id,
                    event_name = %confirmation.event_name,
                    "Join confirmation sent"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(email_id = %email.id, error = ?e, "Join confirmation failed");
                Err(NotificationError::Delivery(format!("{e:#}")))
            }
        }
    }

    pub async fn health_check(&self) -> NotificationResult<()> {
        self.provider
            .health_check()
            .await
            .map_err(|e| NotificationError::Delivery(format!("{e:#}")))
    }
}
