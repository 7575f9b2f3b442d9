use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultDirectRateLimiter, Quota};

use crate::error::ApiError;

/// Process-wide token bucket. Rate and burst are fixed at construction;
/// admission is a single atomic check so concurrent requests cannot
/// overspend the bucket.
pub struct RateLimiter {
    inner: DefaultDirectRateLimiter,
}

impl RateLimiter {
    pub fn new(rps: u32, burst: u32) -> Self {
        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
        Self {
            inner: governor::RateLimiter::direct(Quota::per_second(rps).allow_burst(burst)),
        }
    }

    pub fn try_acquire(&self) -> bool {
        self.inner.check().is_ok()
    }
}

/// Admission gate at the front of the pipeline. Rejected requests never
/// reach the timeout stage or a handler.
pub async fn rate_limit(limiter: Arc<RateLimiter>, request: Request, next: Next) -> Response {
    if !limiter.try_acquire() {
        return ApiError::too_many_requests("rate limit exceeded").into_response();
    }
    next.run(request).await
}
