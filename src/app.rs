use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::{require_session, session_middleware};
use crate::state::AppState;

/// Full router: routes, session resolution, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.frontend_url);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_routes())
        .merge(item_routes())
        .merge(analysis_routes())
        // Session required
        .merge(protected_routes())
        // Global middleware
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use public::oauth;

    Router::new()
        .route("/auth/:provider", get(oauth::login))
        .route("/auth/:provider/callback", get(oauth::callback))
        .route("/logout", get(oauth::logout))
}

fn item_routes() -> Router<AppState> {
    use axum::routing::put;
    use public::items;

    // Served both bare and under /api
    let mut router = Router::new();
    for prefix in ["", "/api"] {
        router = router
            .route(&format!("{}/items", prefix), get(items::list).post(items::create))
            .route(
                &format!("{}/items/:id", prefix),
                put(items::update).delete(items::delete),
            );
    }
    router
}

fn analysis_routes() -> Router<AppState> {
    use axum::routing::put;
    use public::analyses;

    Router::new()
        .route("/api/analyses", get(analyses::list).post(analyses::create))
        .route("/api/analyses/:id", put(analyses::update).delete(analyses::delete))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(protected::profile::get))
        .route_layer(middleware::from_fn(require_session))
}

/// Credentialed CORS for exactly one origin, the configured frontend.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!("Invalid FRONTEND_URL {:?}, cross-origin requests disabled: {}", frontend_url, e);
            cors
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::auth::AuthGate;
    use crate::config::AppConfig;

    fn router() -> Router {
        let config = AppConfig::development();
        let gate = AuthGate::new(&config);
        app(AppState::with_gate(config, gate))
    }

    async fn send(router: Router, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let (status, body) = send(router(), "GET", "/profile", "").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Not authenticated"}"#);
    }

    #[tokio::test]
    async fn test_items_are_mounted_twice() {
        for uri in ["/items", "/api/items"] {
            let (status, body) = send(router(), "GET", uri, "").await;
            assert_eq!(status, StatusCode::OK, "GET {}", uri);
            assert_eq!(body, "[]");
        }
    }

    #[tokio::test]
    async fn test_unconfigured_provider_fails_login() {
        let request = Request::builder()
            .uri("/auth/google")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/?error=google_failed")
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(router(), "GET", "/nope", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
