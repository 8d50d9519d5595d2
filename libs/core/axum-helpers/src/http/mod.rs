//! HTTP middleware module.
//!
//! - CORS configuration
//! - Security headers
//! - Error envelope for responses produced outside handlers
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{cors_layer, ensure_error_envelope, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(axum::middleware::map_response(ensure_error_envelope))
//!     .layer(cors_layer(Vec::new()));
//! ```

pub mod cors;
pub mod envelope;
pub mod security;

pub use cors::{PROVISIONING_OUTCOME_HEADER, cors_layer, parse_origins};
pub use envelope::ensure_error_envelope;
pub use security::security_headers;
