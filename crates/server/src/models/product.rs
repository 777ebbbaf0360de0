//! Product and variant models.
//!
//! Products mirror Printful sync products; the local rows are created and
//! updated only by the reconciliation engine, never by hand.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;

use pressroom_core::{CategoryId, PrintfulId, ProductId, VariantId};

/// A product synchronized from the Printful catalog.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    /// Printful sync product ID (unique).
    pub printful_id: PrintfulId,
    /// External ID assigned by us when the product was created in Printful.
    pub external_id: Option<String>,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A lightweight product row used for reconciliation diffing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: ProductId,
    pub printful_id: PrintfulId,
    pub name: String,
}

/// A purchasable variant of a product (size/color combination).
///
/// `files` and `options` are opaque Printful JSON blobs; we store them
/// verbatim so the storefront can render mockups without re-fetching.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    /// Printful sync variant ID (unique within the parent product).
    pub printful_id: PrintfulId,
    pub external_id: Option<String>,
    pub name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub retail_price: Option<Decimal>,
    pub currency: Option<String>,
    pub files: Json<serde_json::Value>,
    pub options: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
