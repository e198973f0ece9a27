//! Database monitoring handler.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::dto::{MonitorParams, RecordsResponse};
use crate::app_state::AppState;
use crate::domain::MonitorAspect;
use crate::error::{ErrorResponse, ServiceError};
use crate::service::HealthReport;

/// `GET /db-mon` — Check database connectivity or count stored records.
///
/// Database failures are reported as `500 {}` rather than a structured
/// error body.
///
/// # Errors
///
/// Returns [`ServiceError::UnrecognizedAspect`] for an unknown `aspect`.
#[utoipa::path(
    get,
    path = "/db-mon",
    tag = "Monitoring",
    summary = "Database health check",
    description = "`aspect=conn` runs `SELECT 1`; `aspect=records` returns the number of stored records.",
    params(MonitorParams),
    responses(
        (status = 200, description = "Check passed; `{}` for conn, `{\"records\": N}` for records", body = serde_json::Value),
        (status = 400, description = "Unrecognized aspect", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Database unreachable or query failed; empty object body"),
    )
)]
pub async fn db_monitor_handler(
    State(state): State<AppState>,
    Query(params): Query<MonitorParams>,
) -> Result<Response, ServiceError> {
    let aspect: MonitorAspect = params.aspect.parse()?;

    let response = match state.sync_service.check(aspect).await {
        Ok(HealthReport::Connected) => Json(serde_json::json!({})).into_response(),
        Ok(HealthReport::Records(records)) => Json(RecordsResponse { records }).into_response(),
        Err(err) => {
            tracing::error!(?aspect, error = %err, "database health check failed");
            let mut response = Json(serde_json::json!({})).into_response();
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    };

    Ok(response)
}
