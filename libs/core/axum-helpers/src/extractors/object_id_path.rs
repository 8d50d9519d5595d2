use crate::errors::AppError;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use mongodb::bson::oid::ObjectId;

/// Path extractor that parses a single `{id}` segment into an [`ObjectId`].
///
/// Anything that is not a 24-character hex string is rejected with
/// 400 `INVALID_ID` before the handler runs, so repositories never see a
/// malformed id.
///
/// ```ignore
/// async fn get_event(ObjectIdPath(id): ObjectIdPath) -> String {
///     id.to_hex()
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectIdPath(pub ObjectId);

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        ObjectId::parse_str(&raw)
            .map(ObjectIdPath)
            .map_err(|_| AppError::InvalidId(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn echo(ObjectIdPath(id): ObjectIdPath) -> String {
        id.to_hex()
    }

    async fn call(uri: &str) -> (StatusCode, Vec<u8>) {
        let app = Router::new().route("/events/{id}", get(echo));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_valid_object_id() {
        let (status, body) = call("/events/65a1b2c3d4e5f6a7b8c9d0e1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"65a1b2c3d4e5f6a7b8c9d0e1");
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let (status, body) = call("/events/not-an-id").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "INVALID_ID");
        assert_eq!(json["error"], "Invalid id: not-an-id");
    }
}
