//! Integration tests for Pressroom.
//!
//! # Running Tests
//!
//! ```bash
//! # Pure tests (no external services)
//! cargo test -p pressroom-integration-tests
//!
//! # Live API tests against a running server + database
//! pressroom migrate
//! cargo run -p pressroom-server &
//! cargo test -p pressroom-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog_reconciliation` - Deletion planning, verification, categorization
//! - `order_translation` - Snipcart checkout payload to Printful order mapping
//! - `api_live` - HTTP surface tests (require a running server; `#[ignore]`d)

/// Base URL for the API server (configurable via environment).
#[must_use]
pub fn server_base_url() -> String {
    std::env::var("PRESSROOM_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
