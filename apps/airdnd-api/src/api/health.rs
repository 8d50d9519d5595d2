//! Readiness probe

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 `{"status": "ready", "mongodb": "connected"}`, or 503 when the ping fails.
async fn readiness_check(State(state): State<AppState>) -> Response {
    let mongodb: HealthCheckFuture<'_> = Box::pin(database::mongodb::check_health(&state.db));
    run_health_checks(vec![("mongodb", mongodb)]).await
}
