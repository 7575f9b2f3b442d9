use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::auth::{validate_registration, RegisterRequest};
use super::AppJson;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/v1/users. Same body and validation as register, but returns
/// only the created user without logging it in.
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    validate_registration(&req)?;
    let user = state
        .users
        .register(&req.username, &req.email, &req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users. Always an array, never null.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(json!({ "users": users })))
}

/// GET /api/v1/users/:id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    let user = state.users.get_user(id).await?;
    Ok(Json(user))
}

/// DELETE /api/v1/users/:id.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
