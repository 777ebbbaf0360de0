//! Database operations for the local catalog `PostgreSQL`.
//!
//! # Tables
//!
//! - `products` / `variants` - Mirror of the Printful sync catalog, written
//!   only by the reconciliation engine
//! - `categories` / `tags` / `product_tags` - Locally managed through the
//!   admin API
//! - `sync_logs` - One row per reconciliation run, polled by the admin UI
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p pressroom-cli -- migrate
//! ```

pub mod categories;
pub mod lease;
pub mod products;
pub mod sync_logs;
pub mod tags;
pub mod variants;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use lease::SyncLease;
pub use products::ProductRepository;
pub use sync_logs::{SyncCounters, SyncLogRepository};
pub use tags::TagRepository;
pub use variants::VariantRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique-constraint violation.
pub(crate) fn map_constraint(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(what.to_string());
        }
    }
    RepositoryError::Database(err)
}
