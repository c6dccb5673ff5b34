//! Catalog API response types.
//!
//! Field names follow the API's camelCase JSON. Anything the storefront does
//! not render is ignored on input; optional fields default when absent so a
//! sparse record still renders.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use glownest_core::{DiscountPercentage, Price, ProductId, StockLevel};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// List price in USD.
    pub price: Decimal,
    #[serde(default)]
    pub discount_percentage: Decimal,
    /// Average review score, 0 to 5.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Weight in grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_order_quantity: Option<u32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
}

impl Product {
    /// Undiscounted price.
    #[must_use]
    pub const fn list_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Discount, clamped to a sane percentage.
    #[must_use]
    pub fn discount(&self) -> DiscountPercentage {
        DiscountPercentage::new(self.discount_percentage)
    }

    /// Price after discount.
    #[must_use]
    pub fn sale_price(&self) -> Price {
        self.list_price().discounted(self.discount())
    }

    /// Stock availability.
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::from_units(self.stock)
    }

    /// Number of filled stars (rating rounded down, at most 5).
    #[must_use]
    pub fn full_stars(&self) -> usize {
        stars_for(self.rating)
    }

    /// Gallery image by position: 0 is the thumbnail, `k` is `images[k - 1]`.
    ///
    /// Out-of-range positions fall back to the thumbnail.
    #[must_use]
    pub fn gallery_image(&self, position: usize) -> &str {
        position
            .checked_sub(1)
            .and_then(|i| self.images.get(i))
            .map_or(self.thumbnail.as_str(), String::as_str)
    }
}

/// Filled star count for a 0-5 rating.
#[must_use]
pub fn stars_for(rating: f64) -> usize {
    if rating.is_nan() || rating <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
    let stars = rating.floor().min(5.0) as usize;
    stars
}

/// Physical dimensions in centimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub reviewer_name: String,
    #[serde(default)]
    pub reviewer_email: String,
}

impl Review {
    /// Review date as `M/D/YYYY`, or the raw value if it does not parse.
    #[must_use]
    pub fn display_date(&self) -> String {
        DateTime::parse_from_rfc3339(&self.date).map_or_else(
            |_| self.date.clone(),
            |date| date.format("%-m/%-d/%Y").to_string(),
        )
    }

    /// Filled star count.
    #[must_use]
    pub fn full_stars(&self) -> usize {
        usize::from(self.rating.min(5))
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::str::FromStr;

    use super::*;

    pub(crate) const SAMPLE_PRODUCT: &str = r#"{
        "id": 1,
        "title": "Essence Mascara Lash Princess",
        "description": "Popular mascara.",
        "category": "beauty",
        "price": 9.99,
        "discountPercentage": 7.17,
        "rating": 4.94,
        "stock": 5,
        "tags": ["beauty", "mascara"],
        "brand": "Essence",
        "sku": "RCH45Q1A",
        "weight": 2,
        "dimensions": {"width": 23.17, "height": 14.43, "depth": 28.01},
        "warrantyInformation": "1 month warranty",
        "shippingInformation": "Ships in 1 month",
        "availabilityStatus": "Low Stock",
        "reviews": [
            {
                "rating": 2,
                "comment": "Very unhappy with my purchase!",
                "date": "2024-05-23T08:56:21.618Z",
                "reviewerName": "John Doe",
                "reviewerEmail": "john.doe@x.dummyjson.com"
            }
        ],
        "returnPolicy": "30 days return policy",
        "minimumOrderQuantity": 24,
        "meta": {"barcode": "9164035109868"},
        "images": ["https://cdn.dummyjson.com/products/images/beauty/1.png"],
        "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/thumbnail.png"
    }"#;

    #[test]
    fn test_deserialize_full_product() {
        let product: Product = serde_json::from_str(SAMPLE_PRODUCT).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::from_str("9.99").unwrap());
        assert_eq!(product.brand.as_deref(), Some("Essence"));
        assert_eq!(product.reviews.len(), 1);
        assert_eq!(product.weight, Some(2.0));
        assert_eq!(product.sale_price().display(), "$9.27");
        assert_eq!(product.stock_level(), StockLevel::Low(5));
        assert_eq!(product.full_stars(), 4);
    }

    #[test]
    fn test_deserialize_sparse_product() {
        let product: Product =
            serde_json::from_str(r#"{"id": 9, "title": "Plain", "price": 3}"#).unwrap();
        assert!(product.brand.is_none());
        assert!(product.images.is_empty());
        assert_eq!(product.stock_level(), StockLevel::OutOfStock);
        assert!(!product.discount().is_discounted());
        assert_eq!(product.sale_price().display(), "$3.00");
    }

    #[test]
    fn test_product_survives_storage_roundtrip() {
        let product: Product = serde_json::from_str(SAMPLE_PRODUCT).unwrap();
        let stored = serde_json::to_string(&product).unwrap();
        let restored: Product = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, product);
    }

    #[test]
    fn test_gallery_image() {
        let product: Product = serde_json::from_str(SAMPLE_PRODUCT).unwrap();
        assert!(product.gallery_image(0).ends_with("thumbnail.png"));
        assert!(product.gallery_image(1).ends_with("1.png"));
        assert!(product.gallery_image(7).ends_with("thumbnail.png"));
    }

    #[test]
    fn test_stars_for() {
        assert_eq!(stars_for(4.99), 4);
        assert_eq!(stars_for(5.0), 5);
        assert_eq!(stars_for(7.5), 5);
        assert_eq!(stars_for(-1.0), 0);
        assert_eq!(stars_for(f64::NAN), 0);
    }

    #[test]
    fn test_review_display_date() {
        let product: Product = serde_json::from_str(SAMPLE_PRODUCT).unwrap();
        let review = &product.reviews[0];
        assert_eq!(review.display_date(), "5/23/2024");
        assert_eq!(review.full_stars(), 2);

        let odd = Review {
            date: "last tuesday".to_string(),
            ..review.clone()
        };
        assert_eq!(odd.display_date(), "last tuesday");
    }

    #[test]
    fn test_deserialize_categories() {
        let categories: Vec<Category> = serde_json::from_str(
            r#"[{"slug": "beauty", "name": "Beauty", "url": "https://dummyjson.com/products/category/beauty"}]"#,
        )
        .unwrap();
        assert_eq!(categories[0].slug, "beauty");
        assert_eq!(categories[0].name, "Beauty");
    }
}
