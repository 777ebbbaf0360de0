//! Sync log repository for database operations.
//!
//! The sync log is the only inter-process signal during a reconciliation run:
//! the engine writes progress here and the admin UI polls it.

use sqlx::PgPool;
use sqlx::types::Json;

use pressroom_core::{SyncLogId, SyncStatus};

use super::RepositoryError;
use crate::models::SyncLog;

/// Running counters for a reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SyncCounters {
    pub products_processed: i32,
    pub products_created: i32,
    pub products_updated: i32,
    pub products_deleted: i32,
    pub variants_created: i32,
    pub variants_updated: i32,
    pub variants_deleted: i32,
}

const SELECT_COLUMNS: &str = r"
    SELECT id, operation, status, current_step, progress,
           products_processed, products_created, products_updated, products_deleted,
           variants_created, variants_updated, variants_deleted,
           errors, warnings, started_at, completed_at
    FROM sync_logs
";

/// Repository for sync log database operations.
pub struct SyncLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SyncLogRepository<'a> {
    /// Create a new sync log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Open a new sync log in `queued` status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, operation: &str) -> Result<SyncLog, RepositoryError> {
        let log = sqlx::query_as::<_, SyncLog>(
            r"
            INSERT INTO sync_logs (operation, status, current_step)
            VALUES ($1, 'queued', 'queued')
            RETURNING id, operation, status, current_step, progress,
                      products_processed, products_created, products_updated, products_deleted,
                      variants_created, variants_updated, variants_deleted,
                      errors, warnings, started_at, completed_at
            ",
        )
        .bind(operation)
        .fetch_one(self.pool)
        .await?;

        Ok(log)
    }

    /// Mark a run as running.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_running(&self, id: SyncLogId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE sync_logs SET status = 'running' WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Update the current step, progress percentage, and counters.
    ///
    /// `GREATEST` keeps the persisted progress monotonic even if a caller
    /// passes a smaller value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_progress(
        &self,
        id: SyncLogId,
        step: &str,
        progress: i32,
        counters: &SyncCounters,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE sync_logs
            SET current_step = $2,
                progress = GREATEST(progress, $3),
                products_processed = $4,
                products_created = $5,
                products_updated = $6,
                products_deleted = $7,
                variants_created = $8,
                variants_updated = $9,
                variants_deleted = $10
            WHERE id = $1 AND completed_at IS NULL
            ",
        )
        .bind(id)
        .bind(step)
        .bind(progress)
        .bind(counters.products_processed)
        .bind(counters.products_created)
        .bind(counters.products_updated)
        .bind(counters.products_deleted)
        .bind(counters.variants_created)
        .bind(counters.variants_updated)
        .bind(counters.variants_deleted)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Finalize a run. After this the row is never mutated again
    /// (`completed_at IS NULL` guards every other update).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn finalize(
        &self,
        id: SyncLogId,
        status: SyncStatus,
        counters: &SyncCounters,
        errors: &[String],
        warnings: &[String],
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE sync_logs
            SET status = $2,
                current_step = 'completed',
                progress = 100,
                products_processed = $3,
                products_created = $4,
                products_updated = $5,
                products_deleted = $6,
                variants_created = $7,
                variants_updated = $8,
                variants_deleted = $9,
                errors = $10,
                warnings = $11,
                completed_at = now()
            WHERE id = $1 AND completed_at IS NULL
            ",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(counters.products_processed)
        .bind(counters.products_created)
        .bind(counters.products_updated)
        .bind(counters.products_deleted)
        .bind(counters.variants_created)
        .bind(counters.variants_updated)
        .bind(counters.variants_deleted)
        .bind(Json(errors))
        .bind(Json(warnings))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a sync log by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SyncLogId) -> Result<Option<SyncLog>, RepositoryError> {
        let log = sqlx::query_as::<_, SyncLog>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(log)
    }

    /// Get the most recent sync log for an operation, for polling.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(&self, operation: &str) -> Result<Option<SyncLog>, RepositoryError> {
        let log = sqlx::query_as::<_, SyncLog>(&format!(
            "{SELECT_COLUMNS} WHERE operation = $1 ORDER BY started_at DESC LIMIT 1"
        ))
        .bind(operation)
        .fetch_optional(self.pool)
        .await?;

        Ok(log)
    }
}
