//! Cart persistence.
//!
//! The cart lives under the `cart` key as a JSON array of line items. Reads
//! never fail: anything unreadable is logged and treated as an empty cart.

use tracing::warn;

use crate::models::Cart;
use crate::storage::{KeyValueStore, StorageError, keys};

/// Load the cart from `store`.
#[must_use]
pub fn load_cart<S: KeyValueStore>(store: &S) -> Cart {
    match store.get_json::<Cart>(keys::CART) {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable cart");
            Cart::new()
        }
    }
}

/// Save `cart` into `store`.
///
/// # Errors
///
/// Returns an error if the cart does not fit in the store's quota.
pub fn save_cart<S: KeyValueStore>(store: &mut S, cart: &Cart) -> Result<(), StorageError> {
    store.set_json(keys::CART, cart)
}

/// Save `cart`, logging a failure instead of returning it.
///
/// The caller keeps showing its in-memory cart either way.
pub fn save_cart_or_log<S: KeyValueStore>(store: &mut S, cart: &Cart) {
    if let Err(e) = save_cart(store, cart) {
        tracing::error!(error = %e, lines = cart.line_count(), "Failed to save cart");
    }
}
