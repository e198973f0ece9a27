//! Ingestion handler: paginate the upstream and store the results.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::api::dto::{SyncParams, SyncResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ServiceError};

/// `POST /sync` — Pull every page of a resource and store new records.
///
/// # Errors
///
/// Returns [`ServiceError`] if an upstream record has no `id` or the
/// database write fails.
#[utoipa::path(
    post,
    path = "/sync",
    tag = "Sync",
    summary = "Sync records from the upstream API",
    description = "Follows the upstream `info.next` links starting at `https://{source_url}/api/{resource}` and inserts every record whose id is not stored yet. Upstream failures end pagination early.",
    params(SyncParams),
    responses(
        (status = 201, description = "Sync completed", body = SyncResponse),
        (status = 400, description = "Upstream record without an integer id", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse),
    )
)]
pub async fn sync_handler(
    State(state): State<AppState>,
    Query(params): Query<SyncParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state
        .sync_service
        .sync(&params.source_url, &params.resource)
        .await?;

    Ok((StatusCode::CREATED, Json(SyncResponse::from(outcome))))
}
