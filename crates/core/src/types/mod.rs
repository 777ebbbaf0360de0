//! Core types for Pressroom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod shipping;
pub mod status;

pub use id::*;
pub use shipping::ShippingTier;
pub use status::SyncStatus;
