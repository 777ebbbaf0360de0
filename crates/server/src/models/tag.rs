//! Tag model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pressroom_core::TagId;

/// A free-form product tag, managed through the admin API.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// URL-safe unique identifier (e.g., "summer-drop").
    pub slug: String,
    pub color: Option<String>,
    /// Number of products currently carrying this tag.
    pub usage_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
