//! Sync trigger and status endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, instrument};

use crate::db::{SyncLease, SyncLogRepository};
use crate::error::{AppError, Result};
use crate::models::SyncLog;
use crate::state::AppState;
use crate::sync::{OPERATION, SyncEngine, SyncOptions};

/// Request body for triggering a sync run. All flags default off.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SyncRequest {
    pub dry_run: bool,
    pub force_delete: bool,
    pub skip_verification: bool,
}

/// Trigger a reconciliation run in the background.
///
/// Returns 202 with the operation name to poll, or 409 if a run already
/// holds the lease. The lease acquired here is handed to the spawned run,
/// so only one of two racing triggers gets the 202.
#[instrument(skip(state, body))]
pub async fn trigger(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>)> {
    // The body is optional; an empty POST runs with default flags.
    let request: SyncRequest = if body.is_empty() {
        SyncRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid sync request body: {e}")))?
    };

    let lease = SyncLease::try_acquire(state.pool(), OPERATION)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::SyncAlreadyRunning)?;

    let options = SyncOptions {
        dry_run: request.dry_run,
        force_delete: request.force_delete,
        skip_verification: request.skip_verification,
    };
    let engine = SyncEngine::new(state.pool().clone(), state.printful().clone(), options);

    tokio::spawn(async move {
        if let Err(e) = engine.run_with_lease(lease).await {
            error!(error = %e, "background reconciliation run failed");
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "ok": true, "operation": OPERATION })),
    ))
}

/// Latest sync log for the catalog-sync operation, for admin polling.
#[instrument(skip(state))]
pub async fn status(State(state): State<AppState>) -> Result<Json<SyncLog>> {
    let log = SyncLogRepository::new(state.pool())
        .latest(OPERATION)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("no sync runs recorded".to_string()))?;

    Ok(Json(log))
}
