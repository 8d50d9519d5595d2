//! Transactional email for AirDND.
//!
//! - **Models**: [`Email`], a single outbound message
//! - **Providers**: [`SmtpProvider`] (lettre) and [`MockSmtpProvider`] behind
//!   the [`EmailProvider`] trait
//! - **Templates**: Handlebars-based [`TemplateEngine`]
//! - **Notifier**: [`JoinNotifier`], the event-joined confirmation
//!
//! ```ignore
//! use email::{JoinConfirmation, JoinNotifier, SmtpConfig, SmtpProvider, TemplateEngine};
//! use core_config::FromEnv;
//!
//! let provider = SmtpProvider::new(SmtpConfig::from_env()?)?;
//! let notifier = JoinNotifier::new(Arc::new(provider), Arc::new(TemplateEngine::new()?));
//! notifier.send_join_confirmation(&confirmation).await?;
//! ```

pub mod error;
pub mod models;
pub mod notifier;
pub mod provider;
pub mod templates;

pub use error::{NotificationError, NotificationResult};
pub use models::Email;
pub use notifier::{JoinConfirmation, JoinNotifier};
pub use provider::{
    EmailProvider, EmailProviderKind, MockSmtpProvider, SendResult, SmtpConfig, SmtpProvider,
};
pub use templates::{EmailTemplate, RenderedTemplate, TemplateEngine};
