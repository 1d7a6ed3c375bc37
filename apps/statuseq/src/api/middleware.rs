//! # Middleware Module
//!
//! Request throttling for the statuseq HTTP API.
//!
//! The limit is read from `[server] rate_limit`. `STATUSEQ_RATE_LIMIT`, when it
//! holds a number, replaces the configured value. A resolved limit of 0 means
//! no limiter is installed at all.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Environment variable overriding the configured rate limit.
pub const RATE_LIMIT_ENV_VAR: &str = "STATUSEQ_RATE_LIMIT";

/// One bucket shared by every client of the server.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

// =============================================================================
// LIMIT RESOLUTION
// =============================================================================

/// Resolve the effective limit from an optional override and the configured value.
///
/// A non-numeric override is ignored with a warning.
pub fn resolve_rate_limit(override_value: Option<&str>, configured: u32) -> Option<NonZeroU32> {
    let requests_per_second = match override_value.map(str::trim) {
        Some(raw) => match raw.parse::<u32>() {
            Ok(value) => {
                tracing::debug!(value, configured, "{} overrides [server] rate_limit", RATE_LIMIT_ENV_VAR);
                value
            }
            Err(e) => {
                tracing::warn!(raw, "Ignoring {}: {}", RATE_LIMIT_ENV_VAR, e);
                configured
            }
        },
        None => configured,
    };
    NonZeroU32::new(requests_per_second)
}

/// Effective limit for this process: the environment override, else `configured`.
pub fn effective_rate_limit(configured: u32) -> Option<NonZeroU32> {
    let override_value = std::env::var(RATE_LIMIT_ENV_VAR).ok();
    resolve_rate_limit(override_value.as_deref(), configured)
}

/// Build the shared limiter for a resolved, non-zero limit.
#[must_use]
pub fn create_rate_limiter(requests_per_second: NonZeroU32) -> GlobalRateLimiter {
    Arc::new(RateLimiter::direct(Quota::per_second(requests_per_second)))
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Reject requests over quota with 429 and a `Retry-After` hint in whole seconds.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Err(not_until) = limiter.check() else {
        return next.run(request).await;
    };

    let wait = not_until.wait_time_from(DefaultClock::default().now());
    let retry_after = wait.as_secs().saturating_add(1);
    tracing::warn!(
        path = %request.uri().path(),
        retry_after,
        "Rate limit exceeded"
    );

    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, HeaderValue::from(retry_after))],
        "Too Many Requests",
    )
        .into_response()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_limit_applies_without_override() {
        assert_eq!(resolve_rate_limit(None, 25).map(NonZeroU32::get), Some(25));
        assert_eq!(resolve_rate_limit(None, 0), None);
    }

    #[test]
    fn numeric_override_wins_over_config() {
        assert_eq!(resolve_rate_limit(Some("7"), 25).map(NonZeroU32::get), Some(7));
        assert_eq!(resolve_rate_limit(Some(" 0 "), 25), None);
        assert_eq!(resolve_rate_limit(Some("40"), 0).map(NonZeroU32::get), Some(40));
    }

    #[test]
    fn garbage_override_falls_back_to_config() {
        assert_eq!(resolve_rate_limit(Some("fast"), 25).map(NonZeroU32::get), Some(25));
        assert_eq!(resolve_rate_limit(Some(""), 0), None);
    }

    #[test]
    fn limiter_rejects_burst_beyond_quota() {
        let limiter = create_rate_limiter(NonZeroU32::MIN);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }
}
