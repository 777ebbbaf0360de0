//! Carrier service-level tiers for order fulfillment.

use serde::{Deserialize, Serialize};

/// Carrier service level submitted with a Printful order.
///
/// The cart provider lets merchants define arbitrary shipping-rate codes, so
/// the mapping from rate code to tier must be total: anything we do not
/// recognize ships at the standard tier rather than failing the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingTier {
    /// Default ground shipping.
    #[default]
    Standard,
    /// Expedited (2-3 business days).
    Express,
    /// Next business day.
    Overnight,
}

impl ShippingTier {
    /// Map a cart-provider shipping-rate code to a tier.
    ///
    /// Matching is case-insensitive and total; unrecognized codes (including
    /// the empty string) fall back to [`ShippingTier::Standard`].
    #[must_use]
    pub fn from_rate_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "express" | "express-shipping" | "expedited" | "priority" => Self::Express,
            "overnight" | "overnight-shipping" | "next-day" => Self::Overnight,
            _ => Self::Standard,
        }
    }

    /// The Printful `shipping` field value for this tier.
    #[must_use]
    pub const fn printful_code(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Express => "EXPRESS",
            Self::Overnight => "OVERNIGHT",
        }
    }
}

impl core::fmt::Display for ShippingTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.printful_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(ShippingTier::from_rate_code("express"), ShippingTier::Express);
        assert_eq!(ShippingTier::from_rate_code("Priority"), ShippingTier::Express);
        assert_eq!(
            ShippingTier::from_rate_code("overnight-shipping"),
            ShippingTier::Overnight
        );
    }

    #[test]
    fn test_unrecognized_codes_default_to_standard() {
        for code in ["", "free", "pigeon", "standard", "whatever-the-merchant-typed"] {
            assert_eq!(ShippingTier::from_rate_code(code), ShippingTier::Standard);
        }
    }
}
