//! Pipeline composition tests that run without a database. The state is
//! built over a lazy pool, so anything the middleware rejects before a
//! handler runs can be exercised directly.

use axum::body::Body;
use axum::http::{header::AUTHORIZATION, Request, StatusCode};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use blog_api::config::AppConfig;
use blog_api::routes;
use blog_api::state::AppState;

fn test_state(config: AppConfig) -> AppState {
    // connect_lazy never touches the network until a query runs.
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .unwrap();
    AppState::new(config, pool)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_not_found_still_carries_pipeline_headers() {
    let app = routes::app(test_state(AppConfig::from_env()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/no/such/route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_protected_route_rejects_missing_token() {
    let app = routes::app(test_state(AppConfig::from_env()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/posts")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"t","content":"c"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    // Outer stages still decorated the rejection.
    assert!(response.headers().contains_key("x-request-id"));
    let body = json_body(response).await;
    assert_eq!(body["error"], "missing or invalid token");
}

#[tokio::test]
async fn test_protected_route_rejects_garbage_token() {
    let app = routes::app(test_state(AppConfig::from_env()));

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/posts/1")
                .header(AUTHORIZATION, "Bearer garbage.token.here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid or expired token");
}

#[tokio::test]
async fn test_public_get_routes_do_not_require_auth() {
    // The lazy pool fails on first query, which proves the request got
    // past every gate and into the handler.
    let mut config = AppConfig::from_env();
    config.database.url = "postgres://nobody@127.0.0.1:1/never".to_string();
    let app = routes::app(test_state(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/posts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_rate_limit_exhaustion_returns_429() {
    let mut config = AppConfig::from_env();
    config.api.rate_limit_rps = 1;
    config.api.rate_limit_burst = 2;
    let app = routes::app(test_state(config));

    let mut last = StatusCode::OK;
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/no/such/route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        last = response.status();
    }

    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_malformed_json_body_gets_json_error_shape() {
    let app = routes::app(test_state(AppConfig::from_env()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"username": "alice", "email":"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid request body");
}

#[tokio::test]
async fn test_register_validation_runs_before_database() {
    let mut config = AppConfig::from_env();
    config.database.url = "postgres://nobody@127.0.0.1:1/never".to_string();
    let app = routes::app(test_state(config));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"bad-email","password":"hunter2!"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "a valid email is required");
}
