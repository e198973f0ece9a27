//! PostgreSQL implementation of the character store.

use sqlx::PgPool;

use crate::domain::{CharacterRecord, SortSpec};
use crate::error::ServiceError;

/// DDL for the single table this service owns.
pub const CREATE_CHARACTER_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS character (id BIGINT PRIMARY KEY, data JSONB NOT NULL)";

/// PostgreSQL-backed character store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct CharacterRepository {
    pool: PgPool,
}

impl CharacterRepository {
    /// Creates a new repository over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `character` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError::Database`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), ServiceError> {
        sqlx::query(CREATE_CHARACTER_TABLE)
            .execute(&self.pool)
            .await?;
        tracing::debug!("character table ready");
        Ok(())
    }

    /// Inserts records in one transaction, skipping identifiers that are
    /// already stored.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidData`] if Postgres rejects a payload,
    /// or [`ServiceError::Database`] on any other database failure. Nothing
    /// is written when an error is returned.
    pub async fn insert_many(&self, records: &[CharacterRecord]) -> Result<u64, ServiceError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for record in records {
            let result = sqlx::query(
                "INSERT INTO character (id, data) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
            )
            .bind(record.id)
            .bind(&record.data)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;

        Ok(inserted)
    }

    /// Returns every stored payload ordered by the given column and
    /// direction.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError::Database`] on database failure.
    pub async fn fetch_sorted(
        &self,
        sort: SortSpec,
    ) -> Result<Vec<serde_json::Value>, ServiceError> {
        // Both halves of the clause come from closed enums.
        let sql = format!("SELECT data FROM character ORDER BY {}", sort.order_by_clause());
        let rows = sqlx::query_scalar::<_, serde_json::Value>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Round-trips `SELECT 1` to prove a connection can be acquired and used.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError::Database`] on database failure.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Counts stored records.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError::Database`] on database failure.
    pub async fn count(&self) -> Result<i64, ServiceError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM character")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
