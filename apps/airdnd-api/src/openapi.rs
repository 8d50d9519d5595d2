//! OpenAPI document for the whole service

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AirDND API",
        version = "0.1.0",
        description = "Board game meetups: events, users and join confirmations"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api", api = domain_events::ApiDoc),
        (path = "/api", api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_paths_are_nested_under_api() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/events",
            "/api/events/{id}",
            "/api/events/join",
            "/api/events/{id}/users",
            "/api/event/{id}",
            "/api/users",
            "/api/users/{id}",
            "/api/auth/session",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(!paths.contains_key("/events"));
    }

    #[test]
    fn test_tags_come_from_both_domains() {
        let doc = ApiDoc::openapi();
        let tags: Vec<_> = doc
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.name)
            .collect();

        assert!(tags.contains(&"Events".to_string()));
        assert!(tags.contains(&"Users".to_string()));
    }
}
