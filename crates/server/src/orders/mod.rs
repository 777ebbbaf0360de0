//! Webhook order translation: Snipcart cart → Printful order.
//!
//! Translation is all-or-nothing per order: every line item must resolve to a
//! Printful sync variant before a single order-creation call is made. A
//! failed resolution aborts the whole translation and no order (not even a
//! draft) is created.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use pressroom_core::{PrintfulId, ShippingTier};

use crate::printful::{
    OrderConfirmation, OrderItem, OrderRequest, PrintfulClient, PrintfulError, Recipient,
    RetailCosts,
};
use crate::snipcart::{CartItem, OrderContent};

/// Errors raised while translating a completed cart into a Printful order.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// A line item's SKU did not resolve to a sync variant.
    #[error("cannot resolve SKU '{sku}': {source}")]
    UnresolvedSku {
        sku: String,
        #[source]
        source: PrintfulError,
    },

    /// The event payload is missing a field the order requires.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A line item carried a zero or negative quantity.
    #[error("invalid quantity {quantity} for SKU '{sku}'")]
    InvalidQuantity { sku: String, quantity: i32 },

    /// The order-creation call itself failed.
    #[error("order creation failed: {0}")]
    Printful(#[from] PrintfulError),
}

/// A cart line item with its SKU resolved to a Printful sync variant.
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    pub sync_variant_id: PrintfulId,
    pub quantity: i32,
    pub retail_price: Option<f64>,
}

/// Translates completed Snipcart orders into Printful orders.
#[derive(Clone)]
pub struct OrderTranslator {
    printful: PrintfulClient,
}

impl OrderTranslator {
    /// Create a new translator.
    #[must_use]
    pub const fn new(printful: PrintfulClient) -> Self {
        Self { printful }
    }

    /// Handle an `order.completed` event end to end.
    ///
    /// # Errors
    ///
    /// Returns `TranslateError` if any SKU fails to resolve, the payload is
    /// missing required fields, or the order-creation call fails. In the
    /// first two cases no remote call beyond the lookups is made.
    #[instrument(skip(self, content), fields(invoice = content.invoice_number.as_deref().unwrap_or("-")))]
    pub async fn handle_order_completed(
        &self,
        content: &OrderContent,
    ) -> Result<OrderConfirmation, TranslateError> {
        let resolved = self.resolve_items(&content.items).await?;
        let request = build_order_request(content, &resolved)?;

        let confirmation = self.printful.create_order(&request).await?;
        info!(
            order_id = %confirmation.id,
            items = resolved.len(),
            "cart translated to Printful order"
        );
        Ok(confirmation)
    }

    /// Resolve every line item's SKU to a sync variant ID.
    ///
    /// The first failure aborts: partial orders are never submitted.
    async fn resolve_items(
        &self,
        items: &[CartItem],
    ) -> Result<Vec<ResolvedItem>, TranslateError> {
        if items.is_empty() {
            return Err(TranslateError::MissingField("items"));
        }

        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity <= 0 {
                return Err(TranslateError::InvalidQuantity {
                    sku: item.id.clone(),
                    quantity: item.quantity,
                });
            }

            let variant = self
                .printful
                .get_variant_by_external_id(&item.id)
                .await
                .map_err(|source| {
                    warn!(sku = %item.id, error = %source, "SKU resolution failed, aborting order");
                    TranslateError::UnresolvedSku {
                        sku: item.id.clone(),
                        source,
                    }
                })?;

            resolved.push(ResolvedItem {
                sync_variant_id: variant.id,
                quantity: item.quantity,
                retail_price: item.price,
            });
        }
        Ok(resolved)
    }
}

/// Assemble the Printful order request from the event payload and the
/// resolved line items. Pure; performs no I/O.
///
/// # Errors
///
/// Returns `TranslateError::MissingField` if a required recipient field is
/// empty, or `TranslateError::InvalidQuantity` if a line item's quantity is
/// not positive.
pub fn build_order_request(
    content: &OrderContent,
    resolved: &[ResolvedItem],
) -> Result<OrderRequest, TranslateError> {
    if let Some(bad) = content.items.iter().find(|item| item.quantity <= 0) {
        return Err(TranslateError::InvalidQuantity {
            sku: bad.id.clone(),
            quantity: bad.quantity,
        });
    }

    let address = &content.shipping_address;
    if address.name.is_empty() {
        return Err(TranslateError::MissingField("shippingAddress.name"));
    }
    if address.address1.is_empty() {
        return Err(TranslateError::MissingField("shippingAddress.address1"));
    }
    if address.city.is_empty() {
        return Err(TranslateError::MissingField("shippingAddress.city"));
    }
    if address.country.is_empty() {
        return Err(TranslateError::MissingField("shippingAddress.country"));
    }
    if address.postal_code.is_empty() {
        return Err(TranslateError::MissingField("shippingAddress.postalCode"));
    }

    let tier = content
        .shipping_rate_user_defined_id
        .as_deref()
        .map_or(ShippingTier::Standard, ShippingTier::from_rate_code);

    let items = resolved
        .iter()
        .map(|item| OrderItem {
            sync_variant_id: item.sync_variant_id,
            quantity: item.quantity,
            retail_price: item.retail_price.and_then(to_decimal),
        })
        .collect();

    let retail_costs = RetailCosts {
        currency: content.currency.as_ref().map(|c| c.to_uppercase()),
        subtotal: content.subtotal.and_then(to_decimal),
        shipping: content.shipping_fees.and_then(to_decimal),
        tax: content.taxes_total.and_then(to_decimal),
        total: content.grand_total.and_then(to_decimal),
    };

    Ok(OrderRequest {
        external_id: content.invoice_number.clone(),
        shipping: tier.printful_code().to_string(),
        recipient: Recipient {
            name: address.name.clone(),
            address1: address.address1.clone(),
            address2: address.address2.clone(),
            city: address.city.clone(),
            state_code: address.province.clone(),
            country_code: address.country.clone(),
            zip: address.postal_code.clone(),
            email: content.email.clone(),
            phone: address.phone.clone(),
        },
        items,
        retail_costs: Some(retail_costs),
    })
}

/// Convert a Snipcart float amount to `Decimal`, rounded to cents.
fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok().map(|d| d.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snipcart::ShippingAddress;

    fn sample_content() -> OrderContent {
        OrderContent {
            invoice_number: Some("SNIP-1042".to_string()),
            email: Some("jo@example.com".to_string()),
            items: vec![CartItem {
                id: "tee-navy-xl".to_string(),
                name: Some("Logo Tee".to_string()),
                quantity: 2,
                price: Some(24.0),
            }],
            shipping_address: ShippingAddress {
                name: "Jo Doe".to_string(),
                address1: "19 Harbor Rd".to_string(),
                address2: None,
                city: "Portland".to_string(),
                province: Some("ME".to_string()),
                country: "US".to_string(),
                postal_code: "04101".to_string(),
                phone: None,
            },
            shipping_rate_user_defined_id: Some("express".to_string()),
            currency: Some("usd".to_string()),
            subtotal: Some(48.0),
            shipping_fees: Some(4.99),
            taxes_total: Some(2.64),
            grand_total: Some(55.63),
        }
    }

    fn resolved_one() -> Vec<ResolvedItem> {
        vec![ResolvedItem {
            sync_variant_id: PrintfulId::new(1001),
            quantity: 2,
            retail_price: Some(24.0),
        }]
    }

    #[test]
    fn test_build_order_request_maps_shipping_tier() {
        let request = build_order_request(&sample_content(), &resolved_one()).expect("build");
        assert_eq!(request.shipping, "EXPRESS");
    }

    #[test]
    fn test_build_order_request_defaults_to_standard() {
        let mut content = sample_content();
        content.shipping_rate_user_defined_id = Some("carrier-pigeon".to_string());
        let request = build_order_request(&content, &resolved_one()).expect("build");
        assert_eq!(request.shipping, "STANDARD");

        content.shipping_rate_user_defined_id = None;
        let request = build_order_request(&content, &resolved_one()).expect("build");
        assert_eq!(request.shipping, "STANDARD");
    }

    #[test]
    fn test_build_order_request_recipient_and_costs() {
        let request = build_order_request(&sample_content(), &resolved_one()).expect("build");

        assert_eq!(request.recipient.name, "Jo Doe");
        assert_eq!(request.recipient.state_code.as_deref(), Some("ME"));
        assert_eq!(request.recipient.zip, "04101");
        assert_eq!(request.external_id.as_deref(), Some("SNIP-1042"));

        let costs = request.retail_costs.expect("retail costs");
        assert_eq!(costs.currency.as_deref(), Some("USD"));
        assert_eq!(costs.total, to_decimal(55.63));
    }

    #[test]
    fn test_build_order_request_rejects_missing_address() {
        let mut content = sample_content();
        content.shipping_address.address1 = String::new();

        let err = build_order_request(&content, &resolved_one()).expect_err("must fail");
        assert!(matches!(
            err,
            TranslateError::MissingField("shippingAddress.address1")
        ));
    }

    #[test]
    fn test_build_order_request_rejects_zero_quantity() {
        let mut content = sample_content();
        content.items[0].quantity = 0;

        let err = build_order_request(&content, &resolved_one()).expect_err("must fail");
        assert!(matches!(
            err,
            TranslateError::InvalidQuantity { quantity: 0, ref sku } if sku.as_str() == "tee-navy-xl"
        ));
    }

    #[test]
    fn test_to_decimal_rounds_to_cents() {
        let d = to_decimal(4.994_999).expect("decimal");
        assert_eq!(d, Decimal::new(499, 2));
    }
}
