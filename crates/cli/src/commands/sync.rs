//! Catalog reconciliation command.
//!
//! # Usage
//!
//! ```bash
//! # Full reconciliation
//! pressroom sync
//!
//! # Report what would change without writing
//! pressroom sync --dry-run
//!
//! # Delete orphans without re-checking them against the API
//! pressroom sync --force-delete
//! ```
//!
//! # Environment Variables
//!
//! - `PRESSROOM_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `PRINTFUL_API_TOKEN` - Printful API bearer token

use tracing::{info, warn};

use pressroom_core::SyncStatus;
use pressroom_server::config::{self, PrintfulConfig};
use pressroom_server::db;
use pressroom_server::printful::PrintfulClient;
use pressroom_server::sync::{SyncEngine, SyncOptions};

/// Run a full catalog reconciliation and report the outcome.
///
/// A `Partial` outcome (some items failed, run completed) exits cleanly;
/// only a fatal abort propagates as an error.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, another run already holds the lease, or the run aborts
/// before completing.
pub async fn run(
    dry_run: bool,
    force_delete: bool,
    skip_verification: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = config::database_url_from_env()?;
    let printful_config = PrintfulConfig::from_env()?;

    let pool = db::create_pool(&database_url).await?;
    let printful = PrintfulClient::new(&printful_config)?;

    let options = SyncOptions {
        dry_run,
        force_delete,
        skip_verification,
    };

    info!(dry_run, force_delete, skip_verification, "Starting catalog sync");

    let stats = SyncEngine::new(pool, printful, options).run().await?;

    info!(
        status = %stats.status,
        processed = stats.counters.products_processed,
        created = stats.counters.products_created,
        updated = stats.counters.products_updated,
        deleted = stats.counters.products_deleted,
        variants_created = stats.counters.variants_created,
        variants_updated = stats.counters.variants_updated,
        variants_deleted = stats.counters.variants_deleted,
        duration_secs = stats.duration.as_secs(),
        "Sync finished"
    );

    for warning in &stats.warnings {
        warn!("warning: {warning}");
    }
    for error in &stats.errors {
        warn!("item error: {error}");
    }

    if stats.status == SyncStatus::Partial {
        warn!(
            "completed with {} item error(s); see the sync log for details",
            stats.errors.len()
        );
    }

    Ok(())
}
