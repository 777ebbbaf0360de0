//! Pressroom server library.
//!
//! This crate provides the server functionality as a library, allowing it to
//! be tested and reused (the CLI drives the sync engine through this crate).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod orders;
pub mod printful;
pub mod routes;
pub mod snipcart;
pub mod state;
pub mod sync;
