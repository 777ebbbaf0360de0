//! Checkout-to-order translation scenarios.
//!
//! Deserializes real-shaped Snipcart `order.completed` payloads and checks
//! the Printful order request that comes out the other end, including the
//! JSON body Printful would receive.

use rust_decimal::Decimal;

use pressroom_core::PrintfulId;
use pressroom_server::orders::{ResolvedItem, TranslateError, build_order_request};
use pressroom_server::snipcart::{OrderContent, WebhookEvent};

const EXPRESS_CHECKOUT: &str = r#"{
    "eventName": "order.completed",
    "mode": "Live",
    "content": {
        "invoiceNumber": "SNIP-2001",
        "email": "casey@example.com",
        "currency": "usd",
        "subtotal": 72.00,
        "shippingFees": 12.50,
        "taxesTotal": 4.23,
        "grandTotal": 88.73,
        "shippingRateUserDefinedId": "express-shipping",
        "shippingAddress": {
            "name": "Casey Reed",
            "address1": "500 Pine St",
            "address2": "Apt 4B",
            "city": "Seattle",
            "province": "WA",
            "country": "US",
            "postalCode": "98101",
            "phone": "+12065550123"
        },
        "items": [
            {"id": "hoodie-black-l", "name": "Logo Hoodie (Black, L)", "quantity": 1, "price": 48.00},
            {"id": "tee-white-m", "name": "Logo Tee (White, M)", "quantity": 1, "price": 24.00}
        ]
    }
}"#;

fn express_content() -> OrderContent {
    let event: WebhookEvent = serde_json::from_str(EXPRESS_CHECKOUT).expect("parse");
    assert_eq!(event.event_name, "order.completed");
    event.order_content().expect("order content")
}

fn resolved_for(content: &OrderContent, variant_ids: &[i64]) -> Vec<ResolvedItem> {
    content
        .items
        .iter()
        .zip(variant_ids)
        .map(|(item, &variant_id)| ResolvedItem {
            sync_variant_id: PrintfulId::new(variant_id),
            quantity: item.quantity,
            retail_price: item.price,
        })
        .collect()
}

#[test]
fn test_express_checkout_becomes_express_printful_order() {
    let content = express_content();
    let resolved = resolved_for(&content, &[9001, 9002]);

    let request = build_order_request(&content, &resolved).expect("build");

    assert_eq!(request.external_id.as_deref(), Some("SNIP-2001"));
    assert_eq!(request.shipping, "EXPRESS");
    assert_eq!(request.recipient.name, "Casey Reed");
    assert_eq!(request.recipient.state_code.as_deref(), Some("WA"));
    assert_eq!(request.recipient.country_code, "US");
    assert_eq!(request.items.len(), 2);

    let costs = request.retail_costs.as_ref().expect("retail costs");
    assert_eq!(costs.currency.as_deref(), Some("USD"));
    assert_eq!(costs.total, Some(Decimal::new(8873, 2)));
    assert_eq!(costs.shipping, Some(Decimal::new(1250, 2)));
}

#[test]
fn test_order_request_serializes_to_printful_wire_shape() {
    let content = express_content();
    let resolved = resolved_for(&content, &[9001, 9002]);
    let request = build_order_request(&content, &resolved).expect("build");

    let body = serde_json::to_value(&request).expect("serialize");
    assert_eq!(body["external_id"], "SNIP-2001");
    assert_eq!(body["shipping"], "EXPRESS");
    assert_eq!(body["recipient"]["zip"], "98101");
    assert_eq!(body["items"][0]["sync_variant_id"], 9001);
    assert_eq!(body["items"][0]["quantity"], 1);

    // Decimal carries the with-str serde config, so prices go over the wire
    // as strings (exact digit count depends on the float conversion).
    let price = body["items"][0]["retail_price"]
        .as_str()
        .expect("string price");
    assert_eq!(price.parse::<Decimal>().expect("decimal"), Decimal::new(48, 0));
    let shipping = body["retail_costs"]["shipping"]
        .as_str()
        .expect("string shipping");
    assert_eq!(
        shipping.parse::<Decimal>().expect("decimal"),
        Decimal::new(125, 1)
    );
}

#[test]
fn test_unlabelled_shipping_rate_falls_back_to_standard() {
    let mut content = express_content();
    content.shipping_rate_user_defined_id = Some("flat-rate-us".to_string());
    let resolved = resolved_for(&content, &[9001, 9002]);

    let request = build_order_request(&content, &resolved).expect("build");
    assert_eq!(request.shipping, "STANDARD");
}

#[test]
fn test_incomplete_address_is_rejected_with_field_name() {
    let mut content = express_content();
    content.shipping_address.postal_code.clear();
    let resolved = resolved_for(&content, &[9001, 9002]);

    let err = build_order_request(&content, &resolved).expect_err("should fail");
    assert!(matches!(
        err,
        TranslateError::MissingField("shippingAddress.postalCode")
    ));
}

#[test]
fn test_negative_quantity_is_rejected_before_submission() {
    let mut content = express_content();
    content.items[1].quantity = -1;
    let resolved = resolved_for(&content, &[9001, 9002]);

    let err = build_order_request(&content, &resolved).expect_err("should fail");
    assert!(matches!(
        err,
        TranslateError::InvalidQuantity { quantity: -1, .. }
    ));
}

#[test]
fn test_non_order_event_content_stays_opaque() {
    // Snipcart reuses the envelope for customer and refund events; the
    // webhook route must parse those and acknowledge them, so the envelope
    // cannot require order-shaped content.
    let body = r#"{
        "eventName": "customer.updated",
        "mode": "Live",
        "content": {"email": "casey@example.com"}
    }"#;

    let event: WebhookEvent = serde_json::from_str(body).expect("parse");
    assert_eq!(event.event_name, "customer.updated");
    assert!(event.order_content().is_err());
}
