//! Read handler: every stored payload, sorted.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

use crate::api::dto::DataParams;
use crate::app_state::AppState;
use crate::domain::SortSpec;
use crate::error::{ErrorResponse, ServiceError};

/// `GET /data` — List stored payloads ordered by a whitelisted column.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidSortOrder`] or
/// [`ServiceError::InvalidSortField`] for values outside the whitelist.
#[utoipa::path(
    get,
    path = "/data",
    tag = "Data",
    summary = "List stored records",
    description = "Returns every stored payload. `sort_field` must be `id` or `data` and `sort_order` must be `ASC` or `DESC`, both case-insensitive.",
    params(DataParams),
    responses(
        (status = 200, description = "Stored payloads", body = Vec<serde_json::Value>),
        (status = 400, description = "Invalid sort parameters", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
    )
)]
pub async fn data_handler(
    State(state): State<AppState>,
    Query(params): Query<DataParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let sort = SortSpec::parse(&params.sort_field, &params.sort_order)?;
    let rows = state.sync_service.list(sort).await?;
    Ok(Json(rows))
}
