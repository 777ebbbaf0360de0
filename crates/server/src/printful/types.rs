//! Wire types for the Printful API.
//!
//! Only the fields this system reads are modeled; everything else in the
//! responses is ignored, except variant `files`/`options`, which are stored
//! as opaque JSON for the storefront.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pressroom_core::PrintfulId;

/// The `{code, result, paging}` envelope every Printful response uses.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    pub result: T,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Pagination metadata for listing endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Paging {
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// One entry of `GET /store/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncProductSummary {
    pub id: PrintfulId,
    #[serde(default)]
    pub external_id: Option<String>,
    pub name: String,
    /// Variant count, not the variants themselves.
    #[serde(default)]
    pub variants: i64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// `GET /store/products/{id}` result.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncProductDetail {
    pub sync_product: SyncProduct,
    pub sync_variants: Vec<SyncVariant>,
}

/// The product half of a sync product detail.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncProduct {
    pub id: PrintfulId,
    #[serde(default)]
    pub external_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A sync variant as returned in product detail and variant lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncVariant {
    pub id: PrintfulId,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub sync_product_id: Option<PrintfulId>,
    pub name: String,
    #[serde(default)]
    pub retail_price: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Print/mockup file references, stored verbatim.
    #[serde(default)]
    pub files: serde_json::Value,
    /// Variant options, stored verbatim.
    #[serde(default)]
    pub options: serde_json::Value,
}

impl SyncVariant {
    /// Color and size, falling back to the variant name suffix.
    ///
    /// Printful names sync variants `"<product> - <color> / <size>"`; when the
    /// explicit fields are absent the suffix is the only source.
    #[must_use]
    pub fn color_and_size(&self) -> (Option<String>, Option<String>) {
        if self.color.is_some() || self.size.is_some() {
            return (self.color.clone(), self.size.clone());
        }
        parse_color_size(&self.name)
    }
}

/// Parse `"<product> - <color> / <size>"` into `(color, size)`.
fn parse_color_size(name: &str) -> (Option<String>, Option<String>) {
    let Some((_, suffix)) = name.rsplit_once(" - ") else {
        return (None, None);
    };

    match suffix.split_once(" / ") {
        Some((color, size)) => (
            Some(color.trim().to_string()),
            Some(size.trim().to_string()),
        ),
        // Single-attribute products (e.g., mugs) have only a size
        None => (None, Some(suffix.trim().to_string())),
    }
}

// =============================================================================
// Orders
// =============================================================================

/// `POST /orders` request body.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Our invoice number, stored by Printful as the order's external ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Carrier service level code (e.g., "STANDARD").
    pub shipping: String,
    pub recipient: Recipient,
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retail_costs: Option<RetailCosts>,
}

/// Shipping recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub address1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
    pub country_code: String,
    pub zip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One order line, keyed by the resolved sync variant.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub sync_variant_id: PrintfulId,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<Decimal>,
}

/// Retail costs carried over from the cart so packing slips match checkout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetailCosts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

/// `POST /orders` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub id: PrintfulId,
    #[serde(default)]
    pub external_id: Option<String>,
    pub status: String,
}
