//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use glownest_core::ProductId;

use crate::catalog::{Category, Product, Review};
use crate::error::AppError;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Cart;
use crate::services::auth::current_user;
use crate::services::cart::load_cart;
use crate::state::AppState;
use crate::storage::ClientStorage;

// =============================================================================
// Views
// =============================================================================

/// CSS classes for five rating stars, the first `full` filled.
#[must_use]
pub fn star_classes(full: usize) -> Vec<&'static str> {
    (0..5)
        .map(|i| if i < full { "star star-filled" } else { "star" })
        .collect()
}

/// Product card data for grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub title: String,
    pub brand: String,
    pub thumbnail: String,
    pub price: String,
    pub list_price: Option<String>,
    pub discount_badge: Option<u32>,
    pub rating: String,
    pub stars: Vec<&'static str>,
    pub tags: Vec<String>,
    pub in_stock: bool,
    pub stock_label: &'static str,
    pub in_cart: bool,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, cart: &Cart) -> Self {
        let discount = product.discount();
        let stock = product.stock_level();

        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            brand: product.brand.clone().unwrap_or_default(),
            thumbnail: product.thumbnail.clone(),
            price: product.sale_price().display(),
            list_price: discount
                .is_discounted()
                .then(|| product.list_price().display()),
            discount_badge: discount.is_discounted().then(|| discount.whole_percent()),
            rating: product.rating.to_string(),
            stars: star_classes(product.full_stars()),
            tags: product.tags.clone(),
            in_stock: stock.in_stock(),
            stock_label: stock.short_label(),
            in_cart: cart.is_in_cart(product.id),
        }
    }
}

/// Category select option.
#[derive(Clone)]
pub struct CategoryOption {
    pub slug: String,
    pub name: String,
    pub selected: bool,
}

/// Sort order for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    None,
    /// Cheapest first.
    LowToHigh,
    /// Most expensive first.
    HighToLow,
}

impl SortOrder {
    /// Parse the `sort` query value; anything unknown keeps catalog order.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("l2h") => Self::LowToHigh,
            Some("h2l") => Self::HighToLow,
            _ => Self::None,
        }
    }

    /// Query value for this order.
    #[must_use]
    pub const fn as_param(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LowToHigh => "l2h",
            Self::HighToLow => "h2l",
        }
    }
}

/// Keep products in `category` (`all` or empty keeps everything) and sort
/// them by undiscounted price. Sorting is stable.
#[must_use]
pub fn filter_and_sort(mut products: Vec<Product>, category: &str, sort: SortOrder) -> Vec<Product> {
    if !category.is_empty() && category != "all" {
        products.retain(|p| p.category == category);
    }

    match sort {
        SortOrder::None => {}
        SortOrder::LowToHigh => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::HighToLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
    }

    products
}

/// Gallery thumbnail on the detail page.
#[derive(Clone)]
pub struct GalleryImageView {
    pub position: usize,
    pub url: String,
    pub selected: bool,
}

/// Review on the detail page.
#[derive(Clone)]
pub struct ReviewView {
    pub reviewer_name: String,
    pub comment: String,
    pub date: String,
    pub stars: Vec<&'static str>,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            reviewer_name: review.reviewer_name.clone(),
            comment: review.comment.clone(),
            date: review.display_date(),
            stars: star_classes(review.full_stars()),
        }
    }
}

/// Label of the detail page's add-to-cart button.
#[must_use]
pub const fn add_button_label(in_cart: bool, in_stock: bool, logged_in: bool) -> &'static str {
    if in_cart {
        "Add More to Cart"
    } else if !in_stock {
        "Out of Stock"
    } else if !logged_in {
        "Login to Add to Cart"
    } else {
        "Add to Cart"
    }
}

/// Product detail data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: i32,
    pub title: String,
    pub brand: String,
    pub description: String,
    pub category: String,
    pub sku: Option<String>,
    pub weight: Option<String>,
    pub warranty: Option<String>,
    pub shipping: Option<String>,
    pub return_policy: Option<String>,
    pub price: String,
    pub list_price: Option<String>,
    pub discount_badge: Option<u32>,
    pub rating: String,
    pub stars: Vec<&'static str>,
    pub review_count: usize,
    pub stock_detail: String,
    pub stock_low: bool,
    pub in_stock: bool,
    pub max_quantity: u32,
    pub main_image: String,
    pub gallery: Vec<GalleryImageView>,
    pub reviews: Vec<ReviewView>,
    pub button_label: &'static str,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(product: &Product, selected_image: usize, in_cart: bool, logged_in: bool) -> Self {
        let discount = product.discount();
        let stock = product.stock_level();

        // Thumbnail first, then every image
        let gallery = if product.images.is_empty() {
            Vec::new()
        } else {
            std::iter::once(&product.thumbnail)
                .chain(&product.images)
                .enumerate()
                .map(|(position, url)| GalleryImageView {
                    position,
                    url: url.clone(),
                    selected: position == selected_image,
                })
                .collect()
        };

        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            brand: product.brand.clone().unwrap_or_default(),
            description: product.description.clone(),
            category: product.category.clone(),
            sku: product.sku.clone(),
            weight: product.weight.map(|w| format!("{w}g")),
            warranty: product.warranty_information.clone(),
            shipping: product.shipping_information.clone(),
            return_policy: product.return_policy.clone(),
            price: product.sale_price().display(),
            list_price: discount
                .is_discounted()
                .then(|| product.list_price().display()),
            discount_badge: discount.is_discounted().then(|| discount.whole_percent()),
            rating: product.rating.to_string(),
            stars: star_classes(product.full_stars()),
            review_count: product.reviews.len(),
            stock_detail: stock.detail_label(),
            stock_low: stock.is_low(),
            in_stock: stock.in_stock(),
            max_quantity: product.stock.max(1),
            main_image: product.gallery_image(selected_image).to_string(),
            gallery,
            reviews: product.reviews.iter().map(ReviewView::from).collect(),
            button_label: add_button_label(in_cart, stock.in_stock(), logged_in),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCardView>,
    pub categories: Vec<CategoryOption>,
    pub sort: &'static str,
    pub show_tags: bool,
    pub return_to: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductDetailView,
    pub logged_in: bool,
    pub return_to: String,
}

/// Shown for unknown product IDs.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub page: PageContext,
}

// =============================================================================
// Handlers
// =============================================================================

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Display the product listing.
#[instrument(skip(state, storage))]
pub async fn index(
    State(state): State<AppState>,
    storage: ClientStorage,
    Query(query): Query<ProductsQuery>,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let (products, categories) = tokio::join!(catalog.list_products(), catalog.list_categories());

    let products = products.map_or_else(
        |e| {
            tracing::error!("Failed to fetch products: {e}");
            Vec::new()
        },
        |list| list.products,
    );
    let categories: Vec<Category> = categories.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch categories: {e}");
        Vec::new()
    });

    let selected = query.category.unwrap_or_else(|| "all".to_string());
    let sort = SortOrder::from_param(query.sort.as_deref());
    let cart = load_cart(&storage);

    let products = filter_and_sort(products, &selected, sort)
        .iter()
        .map(|p| ProductCardView::new(p, &cart))
        .collect();

    let categories = categories
        .into_iter()
        .map(|c| CategoryOption {
            selected: c.slug == selected,
            slug: c.slug,
            name: c.name,
        })
        .collect();

    ProductsIndexTemplate {
        page: PageContext::build(&storage).await,
        products,
        categories,
        sort: sort.as_param(),
        show_tags: true,
        return_to: listing_path(&selected, sort),
    }
}

/// Path back to the listing with the current filters.
fn listing_path(category: &str, sort: SortOrder) -> String {
    let mut path = url::form_urlencoded::Serializer::new(String::new());
    if !category.is_empty() && category != "all" {
        path.append_pair("category", category);
    }
    if sort != SortOrder::None {
        path.append_pair("sort", sort.as_param());
    }
    let query = path.finish();
    if query.is_empty() {
        "/products".to_string()
    } else {
        format!("/products?{query}")
    }
}

/// Detail query parameters.
#[derive(Debug, Deserialize)]
pub struct ShowQuery {
    /// Kept raw so a malformed value falls back to the thumbnail.
    pub image: Option<String>,
}

/// Display a product.
#[instrument(skip(state, storage))]
pub async fn show(
    State(state): State<AppState>,
    storage: ClientStorage,
    Path(id): Path<String>,
    Query(query): Query<ShowQuery>,
) -> Response {
    let product = match fetch_product(&state, &id).await {
        Ok(product) => product,
        Err(err) => return product_unavailable(&storage, &err).await,
    };
    let id = product.id;

    let logged_in = current_user(&storage).is_some();
    let in_cart = load_cart(&storage).is_in_cart(id);
    let selected_image = gallery_position(query.image.as_deref());

    crate::error::add_breadcrumb(
        "navigation",
        "Viewed product page",
        Some(&[("product_id", &id.to_string())]),
    );

    ProductShowTemplate {
        page: PageContext::build(&storage).await,
        product: ProductDetailView::new(&product, selected_image, in_cart, logged_in),
        logged_in,
        return_to: format!("/products/{id}"),
    }
    .into_response()
}

/// Look up a product by its raw path segment.
async fn fetch_product(state: &AppState, raw_id: &str) -> Result<Product, AppError> {
    let id = raw_id
        .parse::<ProductId>()
        .map_err(|_| AppError::NotFound(format!("product {raw_id}")))?;
    Ok(state.catalog().get_product(id).await?)
}

/// Gallery position from the `image` query value; anything unparseable is
/// the thumbnail.
fn gallery_position(raw: Option<&str>) -> usize {
    raw.and_then(|p| p.trim().parse().ok()).unwrap_or(0)
}

/// "Product not found" page with the error's status: 404 for unknown
/// products, 502 when the catalog is failing.
async fn product_unavailable(storage: &ClientStorage, err: &AppError) -> Response {
    err.report();
    (
        err.status(),
        ProductNotFoundTemplate {
            page: PageContext::build(storage).await,
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: i32, category: &str, price: f64, discount: f64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Product {id}"),
            "category": category,
            "price": price,
            "discountPercentage": discount,
            "rating": 3.6,
            "stock": 12,
            "images": ["https://cdn.dummyjson.com/a.png", "https://cdn.dummyjson.com/b.png"],
            "thumbnail": "https://cdn.dummyjson.com/thumb.png"
        }))
        .unwrap()
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_gallery_position_is_lenient() {
        assert_eq!(gallery_position(None), 0);
        assert_eq!(gallery_position(Some("")), 0);
        assert_eq!(gallery_position(Some("abc")), 0);
        assert_eq!(gallery_position(Some("-1")), 0);
        assert_eq!(gallery_position(Some("2")), 2);
    }

    #[test]
    fn test_filter_and_sort() {
        let catalog = vec![
            product(1, "beauty", 9.99, 0.0),
            product(2, "fragrances", 49.0, 0.0),
            product(3, "beauty", 5.0, 0.0),
            product(4, "beauty", 9.99, 0.0),
        ];

        assert_eq!(ids(&filter_and_sort(catalog.clone(), "all", SortOrder::None)), [1, 2, 3, 4]);
        assert_eq!(ids(&filter_and_sort(catalog.clone(), "beauty", SortOrder::None)), [1, 3, 4]);
        // Equal prices keep catalog order
        assert_eq!(ids(&filter_and_sort(catalog.clone(), "", SortOrder::LowToHigh)), [3, 1, 4, 2]);
        assert_eq!(ids(&filter_and_sort(catalog.clone(), "all", SortOrder::HighToLow)), [2, 1, 4, 3]);
        assert!(filter_and_sort(catalog, "groceries", SortOrder::None).is_empty());
    }

    #[test]
    fn test_sort_order_param() {
        assert_eq!(SortOrder::from_param(Some("l2h")), SortOrder::LowToHigh);
        assert_eq!(SortOrder::from_param(Some("h2l")), SortOrder::HighToLow);
        assert_eq!(SortOrder::from_param(Some("bogus")), SortOrder::None);
        assert_eq!(SortOrder::from_param(None).as_param(), "none");
    }

    #[test]
    fn test_listing_path() {
        assert_eq!(listing_path("all", SortOrder::None), "/products");
        assert_eq!(
            listing_path("home-decoration", SortOrder::HighToLow),
            "/products?category=home-decoration&sort=h2l"
        );
    }

    #[test]
    fn test_add_button_label() {
        assert_eq!(add_button_label(true, false, true), "Add More to Cart");
        assert_eq!(add_button_label(false, false, true), "Out of Stock");
        assert_eq!(add_button_label(false, true, false), "Login to Add to Cart");
        assert_eq!(add_button_label(false, true, true), "Add to Cart");
    }

    #[test]
    fn test_card_view() {
        let mut cart = Cart::new();
        let discounted = product(1, "beauty", 10.0, 12.6);
        cart.add(&discounted);

        let card = ProductCardView::new(&discounted, &cart);
        assert_eq!(card.price, "$8.74");
        assert_eq!(card.list_price.as_deref(), Some("$10.00"));
        assert_eq!(card.discount_badge, Some(13));
        assert_eq!(card.stars.iter().filter(|c| c.contains("filled")).count(), 3);
        assert!(card.in_cart);

        let plain = ProductCardView::new(&product(2, "beauty", 3.0, 0.0), &cart);
        assert!(plain.list_price.is_none());
        assert!(plain.discount_badge.is_none());
        assert!(!plain.in_cart);
    }

    #[test]
    fn test_detail_view_gallery() {
        let view = ProductDetailView::new(&product(5, "beauty", 3.0, 0.0), 2, false, true);
        assert_eq!(view.main_image, "https://cdn.dummyjson.com/b.png");
        assert_eq!(view.gallery.len(), 3);
        assert!(view.gallery[2].selected);
        assert!(!view.gallery[0].selected);
        assert_eq!(view.stock_detail, "12 available in stock");
        assert_eq!(view.button_label, "Add to Cart");
    }
}
