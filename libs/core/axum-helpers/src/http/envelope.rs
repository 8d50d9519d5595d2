//! Wraps bare error responses in the JSON error envelope.
//!
//! Handlers always answer failures through `AppError`, but some responses
//! never reach a handler: axum's 405 for an unrouted method, the 408 from
//! `TimeoutLayer`, or a 413 from a body limit. Those arrive here with an
//! empty or plain-text body and are rewritten to `{error, code}`.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::errors::{ErrorCode, error_response};

pub async fn ensure_error_envelope(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if is_json {
        return response;
    }

    let code = ErrorCode::from_status(status);
    let message = status
        .canonical_reason()
        .unwrap_or_else(|| code.default_message());

    tracing::debug!(status = status.as_u16(), "Wrapping bare error response");

    let (mut parts, _) = response.into_parts();
    let mut wrapped = error_response(status, code, message);
    // Keep headers such as `Allow` on a 405.
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);
    for (name, value) in parts.headers.iter() {
        wrapped.headers_mut().entry(name).or_insert(value.clone());
    }
    wrapped.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware::map_response,
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/teapot",
                get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }),
            )
            .layer(map_response(ensure_error_envelope))
    }

    async fn call(method: &str, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_success_untouched() {
        let (status, _, body) = call("GET", "/ok").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"fine");
    }

    #[tokio::test]
    async fn test_method_not_allowed_is_wrapped() {
        let (status, headers, body) = call("DELETE", "/ok").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(headers.get(header::ALLOW).is_some());

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "METHOD_NOT_ALLOWED");
        assert_eq!(json["error"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn test_plain_text_error_is_wrapped() {
        let (status, _, body) = call("GET", "/teapot").await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "I'm a teapot");
    }
}
