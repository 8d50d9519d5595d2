//! # Axum Helpers
//!
//! Shared HTTP plumbing for the AirDND services.
//!
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS, security headers, error envelope middleware
//! - **[`errors`]**: `AppError` and the `{error, code}` response body
//! - **[`extractors`]**: validated JSON and ObjectId path extractors

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, create_router_with, health_router, run_health_checks,
};

pub use self::http::{
    PROVISIONING_OUTCOME_HEADER, cors_layer, ensure_error_envelope, security_headers,
};

pub use errors::{AppError, ErrorCode, ErrorResponse};

#[cfg(feature = "mongodb")]
pub use extractors::ObjectIdPath;
pub use extractors::ValidatedJson;
