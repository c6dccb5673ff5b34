//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Mock accounts kept in the client's key-value store
//! - `cart` - Loading and saving the cart
//! - `toast` - One-shot notifications queued in the session

pub mod auth;
pub mod cart;
pub mod toast;
