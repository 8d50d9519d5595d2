//! In-memory provider for tests and local runs without a relay.

use super::{EmailProvider, SendResult};
use crate::models::Email;
use async_trait::async_trait;
use eyre::Result;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Messages kept by [`MockSmtpProvider::new`]; older ones are dropped first.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 100;

/// Records the messages it is asked to send, up to a fixed capacity.
///
/// Clones share the same outbox, so a test can keep one handle and give
/// another to the code under test.
#[derive(Clone)]
pub struct MockSmtpProvider {
    outbox: Arc<Mutex<VecDeque<Email>>>,
    capacity: usize,
    failure: Option<String>,
}

impl Default for MockSmtpProvider {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_OUTBOX_CAPACITY)
    }
}

impl MockSmtpProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `capacity` messages (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outbox: Arc::default(),
            capacity: capacity.max(1),
            failure: None,
        }
    }

    /// A provider whose every send fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Retained messages, oldest first.
    pub async fn sent_emails(&self) -> Vec<Email> {
        self.outbox.lock().await.iter().cloned().collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.outbox.lock().await.len()
    }

    pub async fn was_sent_to(&self, address: &str) -> bool {
        self.outbox.lock().await.iter().any(|e| e.to == address)
    }
}

#[async_trait]
impl EmailProvider for MockSmtpProvider {
    async fn send(&self, email: &Email) -> Result<SendResult> {
        if let Some(message) = &self.failure {
            eyre::bail!("{message}");
        }

        let mut outbox = self.outbox.lock().await;
        if outbox.len() == self.capacity {
            outbox.pop_front();
        }
        outbox.push_back(email.clone());
        drop(outbox);
        tracing::debug!(email_id = %email.id, to = %email.to, "Captured email in mock outbox");

        Ok(SendResult {
            message_id: format!("mock-{}", email.id),
        })
    }

    async fn health_check(&self) -> Result<()> {
        match &self.failure {
            Some(_) => eyre::bail!("Mock health check failed"),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
