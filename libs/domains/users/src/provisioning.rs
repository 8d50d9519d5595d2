//! Find-or-create of a user record after external sign-in.

use crate::models::{CreateUser, User};
use crate::repository::UserRepository;

/// Result of [`ensure_user`]. Never an error: sign-in proceeds regardless.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisioningOutcome {
    /// A record with this email already existed; nothing was written
    Existing(User),
    /// No record existed; one was created with placeholder values
    Created(User),
    /// Lookup or insert failed; the caller continues without a record
    Degraded { reason: String },
}

impl ProvisioningOutcome {
    /// Value for the `x-provisioning-outcome` response header.
    pub fn as_header_value(&self) -> &'static str {
        match self {
            ProvisioningOutcome::Existing(_) => "existing",
            ProvisioningOutcome::Created(_) => "created",
            ProvisioningOutcome::Degraded { .. } => "degraded",
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            ProvisioningOutcome::Existing(user) | ProvisioningOutcome::Created(user) => Some(user),
            ProvisioningOutcome::Degraded { .. } => None,
        }
    }
}

/// Header value when the session carried no email and nothing was attempted.
pub const OUTCOME_SKIPPED: &str = "skipped";

/// Ensures a user with exactly `email` exists.
///
/// Repository failures, including losing a duplicate-key race to a
/// concurrent sign-in, become [`ProvisioningOutcome::Degraded`] and are
/// logged at WARN.
#[tracing::instrument(skip(repository))]
pub async fn ensure_user<R>(repository: &R, email: &str) -> ProvisioningOutcome
where
    R: UserRepository + ?Sized,
{
    let outcome = match repository.find_by_email(email).await {
        Ok(Some(user)) => ProvisioningOutcome::Existing(user),
        Ok(None) => match repository.create(CreateUser::placeholder(email)).await {
            Ok(user) => ProvisioningOutcome::Created(user),
            Err(e) => ProvisioningOutcome::Degraded {
                reason: e.to_string(),
            },
        },
        Err(e) => ProvisioningOutcome::Degraded {
            reason: e.to_string(),
        },
    };

    match &outcome {
        ProvisioningOutcome::Degraded { reason } => {
            tracing::warn!(
                outcome = outcome.as_header_value(),
                %reason,
                "User provisioning degraded"
            );
        }
        other => {
            let user_id = other.user().map(|u| u.id.as_str()).unwrap_or_default();
            tracing::info!(outcome = other.as_header_value(), user_id, "User provisioned");
        }
    }

    outcome
}
