//! Domain models for the storefront.
//!
//! Both models live in the per-client key-value store as JSON and use the
//! camelCase field names of the records the browser client writes.

pub mod cart;
pub mod user;

pub use cart::{Cart, CartItem, QuantityUpdate};
pub use user::{CurrentUser, DEFAULT_PROFILE_PICTURE, User};
