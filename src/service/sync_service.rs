//! Sync service: pulls every upstream page and stores the records.

use crate::domain::{CharacterRecord, MonitorAspect, SortSpec};
use crate::error::ServiceError;
use crate::persistence::CharacterRepository;
use crate::upstream::UpstreamClient;

/// Result of a completed sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Records fetched from the upstream.
    pub records_synced: usize,
    /// Records that were not stored before this sync.
    pub records_inserted: u64,
}

/// Result of a database health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthReport {
    /// The database answered a trivial query.
    Connected,
    /// Number of stored records.
    Records(i64),
}

/// Orchestration layer for sync, read, and monitoring operations.
///
/// Stateless coordinator over an [`UpstreamClient`] and a
/// [`CharacterRepository`].
#[derive(Debug, Clone)]
pub struct SyncService {
    upstream: UpstreamClient,
    repository: CharacterRepository,
}

impl SyncService {
    /// Creates a new `SyncService`.
    #[must_use]
    pub fn new(upstream: UpstreamClient, repository: CharacterRepository) -> Self {
        Self {
            upstream,
            repository,
        }
    }

    /// Paginates `resource` on `source_url` and inserts every record whose
    /// identifier is not stored yet.
    ///
    /// Upstream failures end pagination early and are not errors.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidData`] if a fetched object has no
    /// integer `id`, or [`ServiceError::Database`] if storing fails.
    pub async fn sync(
        &self,
        source_url: &str,
        resource: &str,
    ) -> Result<SyncOutcome, ServiceError> {
        let payloads = self.upstream.collect(source_url, resource).await;
        let records = into_records(payloads)?;

        self.repository.ensure_schema().await?;
        let records_inserted = self.repository.insert_many(&records).await?;

        tracing::info!(
            source_url,
            resource,
            records_synced = records.len(),
            records_inserted,
            "sync completed"
        );

        Ok(SyncOutcome {
            records_synced: records.len(),
            records_inserted,
        })
    }

    /// Returns all stored payloads in the requested order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Database`] on database failure.
    pub async fn list(&self, sort: SortSpec) -> Result<Vec<serde_json::Value>, ServiceError> {
        let rows = self.repository.fetch_sorted(sort).await?;
        tracing::info!(rows = rows.len(), order_by = %sort.order_by_clause(), "fetched data");
        Ok(rows)
    }

    /// Runs the requested database health check.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Database`] if the database cannot be reached
    /// or the query fails.
    pub async fn check(&self, aspect: MonitorAspect) -> Result<HealthReport, ServiceError> {
        match aspect {
            MonitorAspect::Conn => {
                self.repository.ping().await?;
                Ok(HealthReport::Connected)
            }
            MonitorAspect::Records => Ok(HealthReport::Records(self.repository.count().await?)),
        }
    }
}

/// Lifts each upstream object into a [`CharacterRecord`], failing on the
/// first one without an integer `id`.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidData`] for a payload without an `id`.
pub fn into_records(
    payloads: Vec<serde_json::Value>,
) -> Result<Vec<CharacterRecord>, ServiceError> {
    payloads
        .into_iter()
        .map(CharacterRecord::from_payload)
        .collect()
}
