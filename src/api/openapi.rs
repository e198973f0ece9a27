//! OpenAPI document and its routes.
//!
//! With the `swagger-ui` feature the document is served together with an
//! interactive UI at `/docs`; without it only `/openapi.json` is exposed.

use axum::Router;
use utoipa::OpenApi;

use super::handlers;
use crate::app_state::AppState;

/// Generated OpenAPI specification for every public endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "character-sync",
        description = "Syncs paginated character data from a REST API into PostgreSQL and serves it back sorted."
    ),
    paths(
        handlers::sync::sync_handler,
        handlers::data::data_handler,
        handlers::monitor::db_monitor_handler,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Sync", description = "Upstream ingestion"),
        (name = "Data", description = "Stored records"),
        (name = "Monitoring", description = "Database health checks"),
        (name = "System", description = "Service liveness"),
    )
)]
pub struct ApiDoc;

/// Documentation routes.
#[cfg(feature = "swagger-ui")]
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Documentation routes.
#[cfg(not(feature = "swagger-ui"))]
pub fn routes() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new()
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}
