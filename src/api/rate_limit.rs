//! Per-endpoint token-bucket rate limiting backed by `governor`.
//!
//! Each guarded route owns its own [`RouteLimiter`]; exhausting one route's
//! bucket does not affect the others.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

use crate::config::RateLimitConfig;
use crate::error::ServiceError;

/// Token bucket guarding a single route.
pub struct RouteLimiter {
    route: &'static str,
    limiter: DefaultDirectRateLimiter,
    clock: DefaultClock,
}

impl std::fmt::Debug for RouteLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteLimiter")
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

impl RouteLimiter {
    /// Allows `config.burst` requests per `config.window_secs`, refilling one
    /// token every `window / burst`.
    #[must_use]
    pub fn new(route: &'static str, config: RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.burst).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(config.window_secs.max(1));
        let period = window / burst.get();
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            route,
            limiter: RateLimiter::direct(quota),
            clock: DefaultClock::default(),
        }
    }

    /// Takes one token, or reports how long until one is available.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::RateLimited`] when the bucket is empty.
    pub fn check(&self) -> Result<(), ServiceError> {
        self.limiter.check().map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            let retry_after_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(route = self.route, retry_after_ms, "rate limit exceeded");
            ServiceError::RateLimited { retry_after_ms }
        })
    }
}

/// Axum middleware rejecting requests once the route's bucket is empty.
///
/// # Errors
///
/// Returns [`ServiceError::RateLimited`] (HTTP 429) when throttled.
pub async fn enforce(
    State(limiter): State<Arc<RouteLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    limiter.check()?;
    Ok(next.run(request).await)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn allows_burst_then_throttles() {
        let limiter = RouteLimiter::new("/test", RateLimitConfig::default());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());

        let Err(ServiceError::RateLimited { retry_after_ms }) = limiter.check() else {
            panic!("third request should be throttled");
        };
        assert!(retry_after_ms > 0 && retry_after_ms <= 2_500);
    }

    #[test]
    fn zero_burst_is_treated_as_one() {
        let limiter = RouteLimiter::new(
            "/test",
            RateLimitConfig {
                burst: 0,
                window_secs: 60,
            },
        );
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    #[tokio::test]
    async fn refills_after_period() {
        let limiter = RouteLimiter::new(
            "/test",
            RateLimitConfig {
                burst: 1,
                window_secs: 1,
            },
        );
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert!(limiter.check().is_ok());
    }
}
