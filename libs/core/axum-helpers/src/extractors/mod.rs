//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with [`AppError`](crate::AppError), so a bad
//! request body or path id produces the same `{error, code}` envelope as
//! every other failure.

#[cfg(feature = "mongodb")]
pub mod object_id_path;
pub mod validated_json;

#[cfg(feature = "mongodb")]
pub use object_id_path::ObjectIdPath;
pub use validated_json::ValidatedJson;
