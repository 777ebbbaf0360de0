//! Category model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pressroom_core::CategoryId;

/// A storefront category, managed through the admin API.
///
/// Products are assigned a category either by an admin or by the sync
/// engine's auto-categorization of first-seen products.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URL-safe unique identifier (e.g., "t-shirts").
    pub slug: String,
    /// Display color for admin UI chips (hex, e.g., "#4f46e5").
    pub color: Option<String>,
    /// Inactive categories are hidden from storefront reads.
    pub active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
