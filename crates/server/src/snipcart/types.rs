//! Wire types for Snipcart webhook events.
//!
//! Snipcart sends monetary amounts as JSON numbers; they are kept as `f64`
//! here and converted to `Decimal` at the order-translation boundary.

use serde::Deserialize;

/// Event name Snipcart sends when a checkout completes.
pub const EVENT_ORDER_COMPLETED: &str = "order.completed";

/// The outer webhook envelope.
///
/// `content` is event-specific (Snipcart sends the same envelope for order,
/// customer, and refund events), so it stays opaque JSON until the event
/// name has been checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub event_name: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl WebhookEvent {
    /// Decode the content of an `order.completed` event.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if the content is not order-shaped;
    /// only call this after checking the event name.
    pub fn order_content(&self) -> Result<OrderContent, serde_json::Error> {
        serde_json::from_value(self.content.clone())
    }
}

/// The order payload of an `order.completed` event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderContent {
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    /// Merchant-defined shipping rate code chosen at checkout.
    #[serde(default)]
    pub shipping_rate_user_defined_id: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub shipping_fees: Option<f64>,
    #[serde(default)]
    pub taxes_total: Option<f64>,
    #[serde(default)]
    pub grand_total: Option<f64>,
}

/// One cart line item.
///
/// `id` is the SKU the storefront registered with Snipcart, which equals the
/// Printful sync variant's external ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: i32,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Shipping address fields from the checkout form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_completed_event() {
        let body = r#"{
            "eventName": "order.completed",
            "mode": "Live",
            "createdOn": "2026-08-01T14:03:05Z",
            "content": {
                "invoiceNumber": "SNIP-1042",
                "email": "jo@example.com",
                "currency": "usd",
                "subtotal": 48.00,
                "shippingFees": 4.99,
                "taxesTotal": 2.64,
                "grandTotal": 55.63,
                "shippingRateUserDefinedId": "express",
                "shippingAddress": {
                    "name": "Jo Doe",
                    "address1": "19 Harbor Rd",
                    "address2": null,
                    "city": "Portland",
                    "province": "ME",
                    "country": "US",
                    "postalCode": "04101",
                    "phone": "+12075550199"
                },
                "items": [
                    {"id": "tee-navy-xl", "name": "Logo Tee (Navy, XL)", "quantity": 2, "price": 24.00}
                ]
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(body).expect("parse");
        assert_eq!(event.event_name, EVENT_ORDER_COMPLETED);
        let content = event.order_content().expect("order content");
        assert_eq!(content.items.len(), 1);
        let item = content.items.first().expect("one item");
        assert_eq!(item.id, "tee-navy-xl");
        assert_eq!(item.quantity, 2);
        assert_eq!(
            content.shipping_rate_user_defined_id.as_deref(),
            Some("express")
        );
        assert_eq!(content.shipping_address.province.as_deref(), Some("ME"));
    }

    #[test]
    fn test_parse_minimal_event() {
        // Test-mode events can omit most totals
        let body = r#"{
            "eventName": "order.completed",
            "content": {
                "items": [{"id": "mug-11oz", "quantity": 1}],
                "shippingAddress": {
                    "name": "A B",
                    "address1": "1 Main St",
                    "city": "Boston",
                    "country": "US",
                    "postalCode": "02101"
                }
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(body).expect("parse");
        let content = event.order_content().expect("order content");
        assert_eq!(content.grand_total, None);
        assert_eq!(content.shipping_rate_user_defined_id, None);
    }

    #[test]
    fn test_parse_non_order_event() {
        // Snipcart sends the same envelope for every event type; the
        // envelope must parse even when the content is not order-shaped.
        let body = r#"{
            "eventName": "customer.updated",
            "mode": "Live",
            "content": {
                "email": "jo@example.com",
                "billingAddress": {"name": "Jo Doe"}
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(body).expect("parse");
        assert_eq!(event.event_name, "customer.updated");
        assert!(event.order_content().is_err());
    }
}
