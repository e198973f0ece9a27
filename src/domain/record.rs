//! Stored character record.

use crate::error::ServiceError;

/// A single row of the `character` table.
///
/// The identifier is lifted out of the payload so that the storage layer can
/// enforce uniqueness; the payload itself is kept verbatim as JSONB.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    /// Upstream identifier, used as primary key.
    pub id: i64,
    /// Full upstream object.
    pub data: serde_json::Value,
}

impl CharacterRecord {
    /// Builds a record from an upstream result object, reading its `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidData`] if the payload has no integer
    /// `id` field.
    pub fn from_payload(data: serde_json::Value) -> Result<Self, ServiceError> {
        let id = data
            .get("id")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| {
                ServiceError::InvalidData("record is missing an integer `id` field".to_string())
            })?;
        Ok(Self { id, data })
    }
}
