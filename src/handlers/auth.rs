use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{is_valid_email, AppJson};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub(crate) fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::bad_request("username is required"));
    }
    if !is_valid_email(&req.email) {
        return Err(ApiError::bad_request("a valid email is required"));
    }
    if req.password.len() < 6 {
        return Err(ApiError::bad_request(
            "password must be at least 6 characters",
        ));
    }
    Ok(())
}

/// POST /api/v1/auth/register. Creates the account and logs it in, so the
/// client gets a usable token in one round trip.
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate_registration(&req)?;

    let user = state
        .users
        .register(&req.username, &req.email, &req.password)
        .await?;
    let token = state.users.issue_token(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": token,
            "user": user,
            "expires_in": state.users.token_expires_in(),
        })),
    ))
}

/// POST /api/v1/auth/login.
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let (token, user) = state.users.login(&req.email, &req.password).await?;

    Ok(Json(json!({
        "token": token,
        "user": user,
        "expires_in": state.users.token_expires_in(),
    })))
}
