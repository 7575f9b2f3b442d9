use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::TokenService;
use crate::error::ApiError;

/// Route-level bearer-token gate. On success the verified
/// `AuthenticatedUser` is placed in request extensions for handlers to
/// extract; on failure the handler never runs.
pub async fn require_auth(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("missing or invalid token"))?;

    let user = tokens.verify(&token)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
