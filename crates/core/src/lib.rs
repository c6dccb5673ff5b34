//! GlowNest Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront:
//! - type-safe product and user identifiers
//! - decimal prices with discount arithmetic
//! - stock levels
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session access. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, and stock levels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
