//! Domain models backed by the local `PostgreSQL` catalog.

pub mod category;
pub mod product;
pub mod sync_log;
pub mod tag;

pub use category::Category;
pub use product::{Product, ProductSummary, Variant};
pub use sync_log::SyncLog;
pub use tag::Tag;
