//! Callback target for the external sign-in provider.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use axum_helpers::{AppError, PROVISIONING_OUTCOME_HEADER};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::provisioning::OUTCOME_SKIPPED;
use crate::repository::UserRepository;
use crate::service::UserService;

/// Session object as forwarded by the auth provider. Only `user.email` is
/// read; everything else is echoed back untouched.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({ "user": { "email": "ada@example.com", "name": "Ada" }, "expires": "2026-12-01T00:00:00Z" }))]
pub struct SessionPayload {
    pub user: Option<Value>,
}

fn session_email(session: &Value) -> Option<&str> {
    session
        .get("user")?
        .get("email")?
        .as_str()
        .filter(|email| !email.is_empty())
}

/// Provision the signed-in user, then hand the session back
///
/// Always 200 for a JSON body; provisioning problems only show up in the
/// `x-provisioning-outcome` header (`existing`, `created`, `degraded` or
/// `skipped`).
#[utoipa::path(
    post,
    path = "/auth/session",
    tag = "Auth",
    request_body = SessionPayload,
    responses(
        (status = 200, description = "The same session object", body = SessionPayload,
            headers(("x-provisioning-outcome" = String, description = "existing | created | degraded | skipped"))),
        (status = 400, description = "Body is not JSON")
    )
)]
pub async fn session_callback<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(session) = payload?;

    let outcome = match session_email(&session) {
        Some(email) => service.ensure_user(email).await.as_header_value(),
        None => {
            tracing::debug!("Session without user email, provisioning skipped");
            OUTCOME_SKIPPED
        }
    };

    Ok(([(PROVISIONING_OUTCOME_HEADER, outcome)], Json(session)))
}
