//! Keyword auto-categorization for first-seen products.
//!
//! Best-effort only: products whose names match none of the rules stay
//! uncategorized until an admin assigns them, and the sync engine records a
//! warning rather than failing the product.

/// Keyword rules, checked in order; the first match wins.
///
/// Slugs correspond to the default category set seeded by
/// `pressroom-cli categories seed`.
const RULES: &[(&[&str], &str)] = &[
    (&["t-shirt", "tshirt", "tee", "shirt"], "t-shirts"),
    (&["hoodie", "sweatshirt", "crewneck", "pullover"], "hoodies"),
    (&["hat", "cap", "beanie", "snapback"], "hats"),
    (&["mug", "tumbler"], "mugs"),
    // "art print" rather than bare "print": all-over-print garments and
    // totes carry "print" in their names without being wall art.
    (&["poster", "art print", "canvas print"], "posters"),
    (&["sticker"], "stickers"),
    (&["tote", "bag"], "totes"),
];

/// Pick a category slug for a product name, if any rule matches.
#[must_use]
pub fn categorize(product_name: &str) -> Option<&'static str> {
    let lower = product_name.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, slug)| *slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_matches() {
        assert_eq!(categorize("Tidal Logo Tee"), Some("t-shirts"));
        assert_eq!(categorize("Harbor HOODIE (embroidered)"), Some("hoodies"));
        assert_eq!(categorize("Camp Mug 11oz"), Some("mugs"));
        assert_eq!(categorize("Lighthouse Art Print"), Some("posters"));
    }

    #[test]
    fn test_categorize_first_rule_wins() {
        // "shirt" appears before "bag" in the rule table
        assert_eq!(categorize("Shirt & Bag Bundle"), Some("t-shirts"));
    }

    #[test]
    fn test_categorize_print_finish_does_not_hijack_product_type() {
        assert_eq!(categorize("All-Over Print Tote Bag"), Some("totes"));
        assert_eq!(categorize("All-Over Print Beanie"), Some("hats"));
        assert_eq!(categorize("Canvas Print 16x20"), Some("posters"));
    }

    #[test]
    fn test_categorize_no_match() {
        assert_eq!(categorize("Gift Card"), None);
        assert_eq!(categorize(""), None);
    }
}
