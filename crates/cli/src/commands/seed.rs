//! Seed the default category set.
//!
//! # Usage
//!
//! ```bash
//! pressroom categories seed
//! ```
//!
//! Inserts the built-in categories (t-shirts, hoodies, and so on) and
//! leaves any slug that already exists untouched, so re-running is safe.

use tracing::info;

use pressroom_server::config;
use pressroom_server::db::{self, CategoryRepository};

/// Insert the default categories, skipping slugs that already exist.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the insert fails.
pub async fn categories() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = config::database_url_from_env()?;
    let pool = db::create_pool(&database_url).await?;

    let inserted = CategoryRepository::new(&pool).seed_defaults().await?;
    info!(inserted, "Category seed complete");

    Ok(())
}
