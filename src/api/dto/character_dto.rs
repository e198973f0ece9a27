//! Query parameters and response bodies for the character endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::service::SyncOutcome;

/// Query parameters for `POST /sync`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SyncParams {
    /// Upstream host (e.g. `rickandmortyapi.com`), optionally with scheme.
    pub source_url: String,
    /// Resource collection under `/api/` (e.g. `character`).
    pub resource: String,
}

/// Response body for `POST /sync` (201 Created).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SyncResponse {
    /// Always `"success"`.
    pub status: String,
    /// Records fetched from the upstream.
    pub records_synced: usize,
    /// Records newly stored by this sync.
    pub records_inserted: u64,
}

impl From<SyncOutcome> for SyncResponse {
    fn from(outcome: SyncOutcome) -> Self {
        Self {
            status: "success".to_string(),
            records_synced: outcome.records_synced,
            records_inserted: outcome.records_inserted,
        }
    }
}

/// Query parameters for `GET /data`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DataParams {
    /// `id` or `data`, case-insensitive.
    pub sort_field: String,
    /// `ASC` or `DESC`, case-insensitive.
    pub sort_order: String,
}

/// Query parameters for `GET /db-mon`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonitorParams {
    /// `conn` or `records`.
    pub aspect: String,
}

/// Response body for `GET /db-mon?aspect=records`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecordsResponse {
    /// Number of stored records.
    pub records: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_response_reports_success() {
        let response = SyncResponse::from(SyncOutcome {
            records_synced: 5,
            records_inserted: 3,
        });
        let json = serde_json::to_value(&response).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({
                "status": "success",
                "records_synced": 5,
                "records_inserted": 3
            }))
        );
    }
}
