//! Pressroom Core - Shared types library.
//!
//! This crate provides common types used across all Pressroom components:
//! - `server` - Catalog sync, webhook handling, and the JSON API
//! - `cli` - Command-line tools for sync runs and migrations
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, shipping tiers,
//!   and sync statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
