use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware::security_headers_middleware;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/api/status", get(health::api_status))
        .nest("/api/auth", auth::create_auth_router())
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AuthConfig, Environment};
    use crate::domain::auth::FixedClock;
    use crate::infrastructure::auth::TokenServices;
    use crate::infrastructure::user::{AuthService, InMemoryUserRepository, PlaintextCredentials};

    const NOW: i64 = 1_700_000_000;

    fn create_state() -> AppState {
        let config = AuthConfig {
            secret: "router-test-secret-with-enough-bytes".to_string(),
            ..AuthConfig::default()
        };
        let tokens = TokenServices::from_config(
            &config,
            Environment::Development,
            Arc::new(FixedClock::at_timestamp(NOW)),
        )
        .unwrap();

        let service = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(PlaintextCredentials::new()),
            tokens.issuer,
        );

        AppState::new(Arc::new(service), tokens.validator)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(create_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_then_me() {
        let app = create_router(create_state());

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/register",
                json!({"name": "Alice", "email": "alice@example.com", "password": "pw"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["user"]["email"], "alice@example.com");
        let token = json["access_token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["id"], "1");
    }

    #[tokio::test]
    async fn test_me_without_token() {
        let app = create_router(create_state());

        let response = app
            .oneshot(Request::builder().uri("/api/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }

    #[tokio::test]
    async fn test_me_with_garbage_token() {
        let app = create_router(create_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Could not validate credentials");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let app = create_router(create_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
