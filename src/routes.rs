use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::handler::Handler;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::handlers::{auth, posts, users};
use crate::middleware::{
    log_requests, rate_limit, recover, request_id, require_auth, security_headers, timeout,
    RateLimiter,
};
use crate::state::AppState;

/// Assemble the full application: routes plus the middleware pipeline.
/// Layer order matters; in a `ServiceBuilder` the first layer is the
/// outermost, so a request flows request-id → security-headers → logging
/// → recovery → CORS → rate-limit → timeout → router.
pub fn app(state: AppState) -> Router {
    let limiter = Arc::new(RateLimiter::new(
        state.config.api.rate_limit_rps,
        state.config.api.rate_limit_burst,
    ));
    let limit = Duration::from_secs(state.config.api.request_timeout_secs);
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(&state))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id))
                .layer(axum_middleware::from_fn(security_headers))
                .layer(axum_middleware::from_fn(log_requests))
                .layer(axum_middleware::from_fn(recover))
                .layer(cors)
                .layer(axum_middleware::from_fn(move |request, next| {
                    rate_limit(limiter.clone(), request, next)
                }))
                .layer(axum_middleware::from_fn(move |request, next| {
                    timeout(limit, request, next)
                })),
        )
        .with_state(state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    // Auth applies per handler so public and protected methods can share
    // a path without layering the whole router.
    let auth_gate = axum_middleware::from_fn_with_state(state.tokens.clone(), require_auth);

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/users/:id",
            get(users::get_user).delete(users::delete_user),
        )
        .route(
            "/posts",
            get(posts::list_posts).post(posts::create_post.layer(auth_gate.clone())),
        )
        .route("/posts/user/:user_id", get(posts::list_posts_by_user))
        .route(
            "/posts/:id",
            get(posts::get_post)
                .put(posts::update_post.layer(auth_gate.clone()))
                .delete(posts::delete_post.layer(auth_gate)),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}

/// GET /health. 200 while the database answers, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match crate::database::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "up" })),
        ),
        Err(err) => {
            tracing::warn!("health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "error": "database unavailable" })),
            )
        }
    }
}
