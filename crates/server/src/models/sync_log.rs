//! Sync run log model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;

use pressroom_core::{SyncLogId, SyncStatus};

/// One reconciliation run, as persisted for admin polling.
///
/// The engine writes `current_step` and `progress` after each phase; a
/// concurrent admin UI polls this row. `progress` only ever increases within
/// a run. Once `status` is terminal the row is never mutated again.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SyncLog {
    pub id: SyncLogId,
    /// Operation name, e.g. "catalog-sync". Also keys the advisory lease.
    pub operation: String,
    pub status: SyncStatus,
    /// Human-readable description of the current phase.
    pub current_step: String,
    /// Monotonically increasing percentage, 0-100.
    pub progress: i32,
    pub products_processed: i32,
    pub products_created: i32,
    pub products_updated: i32,
    pub products_deleted: i32,
    pub variants_created: i32,
    pub variants_updated: i32,
    pub variants_deleted: i32,
    /// Per-item errors recorded during the run.
    pub errors: Json<Vec<String>>,
    /// Non-blocking anomalies (count mismatches, delete races, categorization failures).
    pub warnings: Json<Vec<String>>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
