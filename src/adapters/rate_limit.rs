use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

// Limiter guarding the publish endpoint.
pub type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Quota context carried alongside the limiter so 429 responses can report
/// the window size.
#[derive(Clone)]
pub struct PublishLimiter {
    pub limiter: SharedRateLimiter,
    pub per_hour: u32,
}

pub fn create_publish_limiter(per_hour: u32) -> PublishLimiter {
    let quota = NonZeroU32::new(per_hour).unwrap_or(NonZeroU32::new(1).unwrap());
    PublishLimiter {
        limiter: Arc::new(RateLimiter::direct(
            Quota::per_hour(quota).allow_burst(quota),
        )),
        per_hour,
    }
}

/// Middleware for the publish route: 429 with a human-readable message and
/// rate-limit headers once the hourly window is exhausted.
pub async fn publish_rate_limit_middleware(
    State(publish): State<PublishLimiter>,
    request: Request,
    next: Next,
) -> Response {
    match publish.limiter.check() {
        Ok(_) => next.run(request).await,
        Err(not_until) => {
            let clock = DefaultClock::default();
            let wait = not_until.wait_time_from(clock.now());
            let retry_secs = wait.as_secs().max(1);

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                format!(
                    "Publish rate limit exceeded ({} per hour). Try again in {} seconds.",
                    publish.per_hour, retry_secs
                ),
            )
                .into_response();
            let headers = response.headers_mut();
            if let Ok(limit) = HeaderValue::from_str(&publish.per_hour.to_string()) {
                headers.insert("x-ratelimit-limit", limit);
            }
            headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
            if let Ok(retry) = HeaderValue::from_str(&retry_secs.to_string()) {
                headers.insert("retry-after", retry);
            }
            response
        }
    }
}
