use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppJson;
use crate::auth::AuthenticatedUser;
use crate::database::models::Post;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Resolve 1-based `page`/`limit` into LIMIT/OFFSET. Non-positive
    /// values fall back to the defaults.
    fn limit_offset(&self) -> (i64, i64) {
        let limit = match self.limit {
            Some(l) if l > 0 => l,
            _ => DEFAULT_PAGE_SIZE,
        };
        let page = match self.page {
            Some(p) if p > 0 => p,
            _ => 1,
        };
        (limit, (page - 1) * limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct PostBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub status: Option<String>,
}

fn validate_post_body(body: &PostBody) -> Result<(), ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }
    if body.content.trim().is_empty() {
        return Err(ApiError::bad_request("content is required"));
    }
    Ok(())
}

/// GET /api/v1/posts?page&limit.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let (limit, offset) = query.limit_offset();
    let posts = state.posts.list_posts(limit, offset).await?;
    Ok(Json(json!({ "posts": posts })))
}

/// GET /api/v1/posts/user/:user_id?page&limit.
pub async fn list_posts_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    if user_id <= 0 {
        return Err(ApiError::bad_request("invalid user id"));
    }
    let (limit, offset) = query.limit_offset();
    let posts = state.posts.list_posts_by_user(user_id, limit, offset).await?;
    Ok(Json(json!({ "posts": posts })))
}

/// GET /api/v1/posts/:id.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts.get_post(id).await?;
    Ok(Json(post))
}

/// POST /api/v1/posts. The author is the authenticated subject; a
/// client-supplied user id is ignored.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(body): AppJson<PostBody>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    validate_post_body(&body)?;
    let post = state
        .posts
        .create_post(user.user_id, &body.title, &body.content, body.status.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/v1/posts/:id. Status stays unchanged when omitted.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(body): AppJson<PostBody>,
) -> Result<Json<Post>, ApiError> {
    validate_post_body(&body)?;
    let post = state
        .posts
        .update_post(id, &body.title, &body.content, body.status.as_deref())
        .await?;
    Ok(Json(post))
}

/// DELETE /api/v1/posts/:id.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    state.posts.delete_post(id).await?;
    Ok(Json(json!({ "message": "post deleted" })))
}
