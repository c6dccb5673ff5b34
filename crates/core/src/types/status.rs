//! Status enums derived from catalog data.

use serde::{Deserialize, Serialize};

/// Stock availability of a product, derived from its unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", content = "units", rename_all = "snake_case")]
pub enum StockLevel {
    /// Nothing left; the product cannot be added to a cart.
    OutOfStock,
    /// Fewer than [`StockLevel::LOW_STOCK_THRESHOLD`] units left.
    Low(u32),
    /// Plenty of units.
    Available(u32),
}

impl StockLevel {
    /// Unit count below which stock is reported as low.
    pub const LOW_STOCK_THRESHOLD: u32 = 10;

    /// Classify a unit count.
    #[must_use]
    pub const fn from_units(units: u32) -> Self {
        if units == 0 {
            Self::OutOfStock
        } else if units < Self::LOW_STOCK_THRESHOLD {
            Self::Low(units)
        } else {
            Self::Available(units)
        }
    }

    /// Whether at least one unit can be bought.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        !matches!(self, Self::OutOfStock)
    }

    /// Short label for product cards.
    #[must_use]
    pub const fn short_label(&self) -> &'static str {
        if self.in_stock() {
            "In Stock"
        } else {
            "Out of Stock"
        }
    }

    /// Sentence for the product detail page.
    #[must_use]
    pub fn detail_label(&self) -> String {
        match self {
            Self::OutOfStock => "Only 0 left in stock!".to_string(),
            Self::Low(units) => format!("Only {units} left in stock!"),
            Self::Available(units) => format!("{units} available in stock"),
        }
    }

    /// Whether the detail label should be highlighted as a warning.
    #[must_use]
    pub const fn is_low(&self) -> bool {
        matches!(self, Self::OutOfStock | Self::Low(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        assert_eq!(StockLevel::from_units(0), StockLevel::OutOfStock);
        assert_eq!(StockLevel::from_units(1), StockLevel::Low(1));
        assert_eq!(StockLevel::from_units(9), StockLevel::Low(9));
        assert_eq!(StockLevel::from_units(10), StockLevel::Available(10));
    }

    #[test]
    fn test_labels() {
        assert_eq!(StockLevel::from_units(0).short_label(), "Out of Stock");
        assert_eq!(StockLevel::from_units(3).short_label(), "In Stock");
        assert_eq!(StockLevel::from_units(3).detail_label(), "Only 3 left in stock!");
        assert_eq!(
            StockLevel::from_units(42).detail_label(),
            "42 available in stock"
        );
    }

    #[test]
    fn test_low_highlighting() {
        assert!(StockLevel::from_units(0).is_low());
        assert!(StockLevel::from_units(5).is_low());
        assert!(!StockLevel::from_units(50).is_low());
    }
}
