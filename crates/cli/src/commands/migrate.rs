//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! pressroom migrate
//! ```
//!
//! # Environment Variables
//!
//! - `PRESSROOM_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migrations live in `crates/server/migrations/` and are embedded at
//! compile time. The server never runs them at startup; this command is
//! the only migration path.

use tracing::info;

use pressroom_server::config;
use pressroom_server::db;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = config::database_url_from_env()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
