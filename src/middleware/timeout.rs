use std::time::Duration;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

/// Bounds request handling at `limit`. The downstream chain runs in its
/// own task and is raced against a deadline; when the deadline wins the
/// client gets a 504 and the `CancellationToken` injected into request
/// extensions is cancelled. Handlers doing long work must poll that
/// token, since the detached task is not aborted and its eventual
/// response is discarded.
pub async fn timeout(limit: Duration, mut request: Request, next: Next) -> Response {
    let cancel = CancellationToken::new();
    request.extensions_mut().insert(cancel.clone());

    let mut downstream = tokio::spawn(next.run(request));

    tokio::select! {
        finished = &mut downstream => match finished {
            Ok(response) => response,
            Err(join_err) => {
                tracing::error!("request task failed: {}", join_err);
                ApiError::internal_server_error("internal server error").into_response()
            }
        },
        _ = tokio::time::sleep(limit) => {
            cancel.cancel();
            ApiError::gateway_timeout("request timeout").into_response()
        }
    }
}
