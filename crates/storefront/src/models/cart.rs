//! Shopping cart.
//!
//! A cart is an ordered list of line items, one per product. Each line keeps
//! a full copy of the product as it was when first added, so the cart page
//! renders without calling the catalog.

use serde::{Deserialize, Serialize};

use glownest_core::{Price, ProductId};

use crate::catalog::Product;

/// One product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Discounted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.sale_price().times(self.quantity)
    }
}

/// What [`Cart::update_quantity`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now has the requested quantity.
    Updated,
    /// The requested quantity was zero or less, so the line was dropped.
    Removed,
    /// No line for that product.
    NotInCart,
}

/// The cart stored under the `cart` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line, or appends a new line with quantity 1.
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.line_mut(product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Add `count` units of `product`, one at a time.
    pub fn add_many(&mut self, product: &Product, count: u32) {
        for _ in 0..count {
            self.add(product);
        }
    }

    /// Drop the line for `id`, returning it.
    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.product.id == id)?;
        Some(self.items.remove(index))
    }

    /// Set the quantity of the line for `id`.
    ///
    /// A quantity of zero or less removes the line.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> QuantityUpdate {
        if quantity <= 0 {
            return match self.remove(id) {
                Some(_) => QuantityUpdate::Removed,
                None => QuantityUpdate::NotInCart,
            };
        }

        let Some(item) = self.line_mut(id) else {
            return QuantityUpdate::NotInCart;
        };
        item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        QuantityUpdate::Updated
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.quantity))
    }

    /// Sum of discounted line totals.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `id` has a line in the cart.
    #[must_use]
    pub fn is_in_cart(&self, id: ProductId) -> bool {
        self.line(id).is_some()
    }

    /// The line for `id`.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == id)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.product.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32, price: &str, discount: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Product {id}"),
            "price": serde_json::Value::from_str(price).unwrap(),
            "discountPercentage": serde_json::Value::from_str(discount).unwrap(),
            "stock": 20,
            "thumbnail": format!("https://cdn.dummyjson.com/{id}.png")
        }))
        .unwrap()
    }

    #[test]
    fn test_add_merges_lines() {
        let mut cart = Cart::new();
        let mascara = product(1, "9.99", "7.17");
        cart.add(&mascara);
        cart.add(&mascara);
        cart.add(&product(2, "19.99", "0"));

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[1].quantity, 1);
    }

    #[test]
    fn test_add_many() {
        let mut cart = Cart::new();
        cart.add_many(&product(1, "5", "0"), 4);
        cart.add_many(&product(1, "5", "0"), 0);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add(&product(1, "5", "0"));
        cart.add(&product(2, "5", "0"));

        assert_eq!(
            cart.update_quantity(ProductId::new(1), 7),
            QuantityUpdate::Updated
        );
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 7);

        assert_eq!(
            cart.update_quantity(ProductId::new(2), 0),
            QuantityUpdate::Removed
        );
        assert!(!cart.is_in_cart(ProductId::new(2)));

        assert_eq!(
            cart.update_quantity(ProductId::new(99), 3),
            QuantityUpdate::NotInCart
        );
        assert_eq!(
            cart.update_quantity(ProductId::new(99), -1),
            QuantityUpdate::NotInCart
        );
        assert_eq!(cart.total_items(), 7);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(&product(1, "5", "0"));
        cart.add(&product(2, "5", "0"));

        let removed = cart.remove(ProductId::new(1)).unwrap();
        assert_eq!(removed.product.title, "Product 1");
        assert!(cart.remove(ProductId::new(1)).is_none());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::zero());
    }

    #[test]
    fn test_total_price_uses_discounted_prices() {
        let mut cart = Cart::new();
        cart.add_many(&product(1, "9.99", "7.17"), 3);
        cart.add(&product(2, "10", "50"));

        // 9.99 * 0.9283 * 3 = 27.820... ; 10 * 0.5 = 5
        assert_eq!(cart.total_price().display(), "$32.82");
        assert_eq!(
            cart.items()[1].line_total().amount,
            Decimal::from_str("5").unwrap()
        );
    }

    #[test]
    fn test_stored_shape_flattens_product() {
        let mut cart = Cart::new();
        cart.add(&product(3, "12.5", "0"));

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], 3);
        assert_eq!(json[0]["title"], "Product 3");
        assert_eq!(json[0]["quantity"], 1);

        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }
}
