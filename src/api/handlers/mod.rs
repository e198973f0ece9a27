//! REST endpoint handlers.

pub mod data;
pub mod monitor;
pub mod sync;
pub mod system;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use super::rate_limit::{self, RouteLimiter};
use crate::app_state::AppState;
use crate::config::RateLimitConfig;

/// Composes the rate-limited character routes. Each route gets its own
/// token bucket.
pub fn routes(rate_limit: RateLimitConfig) -> Router<AppState> {
    let sync_limiter = Arc::new(RouteLimiter::new("/sync", rate_limit));
    let data_limiter = Arc::new(RouteLimiter::new("/data", rate_limit));
    let monitor_limiter = Arc::new(RouteLimiter::new("/db-mon", rate_limit));

    Router::new()
        .route(
            "/sync",
            post(sync::sync_handler)
                .route_layer(middleware::from_fn_with_state(sync_limiter, rate_limit::enforce)),
        )
        .route(
            "/data",
            get(data::data_handler)
                .route_layer(middleware::from_fn_with_state(data_limiter, rate_limit::enforce)),
        )
        .route(
            "/db-mon",
            get(monitor::db_monitor_handler)
                .route_layer(middleware::from_fn_with_state(monitor_limiter, rate_limit::enforce)),
        )
}
