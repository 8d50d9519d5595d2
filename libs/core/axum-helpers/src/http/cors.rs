use axum::http::{HeaderName, HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Response header carrying the result of session provisioning.
pub const PROVISIONING_OUTCOME_HEADER: &str = "x-provisioning-outcome";

/// Builds the CORS layer for the API.
///
/// A non-empty list restricts callers to those origins. An empty list lets
/// any origin call the API.
pub fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers([HeaderName::from_static(PROVISIONING_OUTCOME_HEADER)])
        .max_age(Duration::from_secs(3600));

    if allowed_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed_origins))
    }
}

/// Parses a comma-separated origin list such as
/// `http://localhost:3000, https://airdnd.ai`.
pub fn parse_origins(
    raw: &str,
) -> Result<Vec<HeaderValue>, axum::http::header::InvalidHeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn call(layer: CorsLayer, origin: &str) -> Option<HeaderValue> {
        let app = Router::new().route("/", get(|| async { "ok" })).layer(layer);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_any_origin_when_unset() {
        let allowed = call(cors_layer(Vec::new()), "http://localhost:3000").await;
        assert_eq!(allowed.unwrap(), "*");
    }

    #[tokio::test]
    async fn test_listed_origin() {
        let origins = parse_origins("http://localhost:3000, https://airdnd.ai").unwrap();
        let allowed = call(cors_layer(origins), "https://airdnd.ai").await;
        assert_eq!(allowed.unwrap(), "https://airdnd.ai");
    }

    #[tokio::test]
    async fn test_unlisted_origin_gets_no_header() {
        let origins = parse_origins("https://airdnd.ai").unwrap();
        assert!(call(cors_layer(origins), "https://evil.example").await.is_none());
    }

    #[test]
    fn test_parse_origins_skips_blanks() {
        let origins = parse_origins(" ,https://a.example,, ").unwrap();
        assert_eq!(origins.len(), 1);
    }
}
