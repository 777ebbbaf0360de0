//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB connectivity)
//!
//! # Webhook
//! POST /api/webhook            - Snipcart events (x-request-token required)
//!
//! # Sync
//! POST /api/sync               - Trigger a background reconciliation run
//! GET  /api/sync/status        - Latest sync log, for polling
//!
//! # Storefront catalog (read-only)
//! GET  /api/products           - Product listing
//! GET  /api/products/{id}      - Product detail with variants
//!
//! # Admin
//! PUT    /api/products/{id}/category - Assign or clear a product's category
//! PUT    /api/products/{id}/tags     - Replace a product's tag set
//! GET    /api/categories       - List categories
//! POST   /api/categories       - Create category
//! PUT    /api/categories/{id}  - Update category
//! DELETE /api/categories/{id}  - Delete category
//! GET    /api/tags             - List tags
//! POST   /api/tags             - Create tag
//! PUT    /api/tags/{id}        - Update tag
//! DELETE /api/tags/{id}        - Delete tag
//! ```

pub mod categories;
pub mod products;
pub mod sync;
pub mod tags;
pub mod webhook;

use axum::Router;
use axum::routing::{get, post, put};

use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/webhook", post(webhook::handle))
        .route("/api/sync", post(sync::trigger))
        .route("/api/sync/status", get(sync::status))
        .route("/api/products", get(products::list))
        .route("/api/products/{id}", get(products::detail))
        .route("/api/products/{id}/category", put(products::set_category))
        .route("/api/products/{id}/tags", put(products::set_tags))
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
        .route("/api/tags", get(tags::list).post(tags::create))
        .route("/api/tags/{id}", put(tags::update).delete(tags::remove))
}
