//! REST API layer: route handlers, DTOs, rate limiting, and router
//! composition.

pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod rate_limit;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::RateLimitConfig;

/// Builds the complete API router with all REST endpoints.
pub fn build_router(rate_limit: RateLimitConfig) -> Router<AppState> {
    Router::new()
        .merge(handlers::routes(rate_limit))
        .merge(handlers::system::routes())
        .merge(openapi::routes())
}

/// Builds the servable application: routes, tracing, CORS, and state.
pub fn build_app(state: AppState, rate_limit: RateLimitConfig) -> Router {
    build_router(rate_limit)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
