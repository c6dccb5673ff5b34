//! Cart route handlers.
//!
//! Every mutation is a form POST that saves the cart, queues a toast and
//! redirects, so the toast shows on the page the visitor lands on.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use glownest_core::ProductId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{LOGIN_PATH, PageContext};
use crate::models::{Cart, CartItem, QuantityUpdate};
use crate::services::auth::current_user;
use crate::services::cart::{load_cart, save_cart_or_log};
use crate::services::toast::{self, Toast};
use crate::state::AppState;
use crate::storage::ClientStorage;

/// Shown to guests who try to use the cart.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login to add items to cart";

/// How long the login reminder stays up.
const LOGIN_REQUIRED_DURATION_MS: u64 = 2000;

// =============================================================================
// Views
// =============================================================================

/// Cart line display data.
#[derive(Clone)]
pub struct CartLineView {
    pub id: i32,
    pub title: String,
    pub brand: String,
    pub thumbnail: String,
    pub price: String,
    pub list_price: Option<String>,
    pub discount_badge: Option<u32>,
    pub quantity: u32,
    pub decrement: i64,
    pub increment: i64,
    /// Line total in dollars; formatted by the `money` filter.
    pub line_total: Decimal,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        let product = &item.product;
        let discount = product.discount();

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
            quantity: item.quantity,
            decrement: i64::from(item.quantity) - 1,
            increment: i64::from(item.quantity) + 1,
            line_total: item.line_total().rounded(),
        }
    }
}

/// Cart page display data.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub line_count: usize,
    pub total: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.items().iter().map(CartLineView::from).collect(),
            line_count: cart.line_count(),
            total: cart.total_price().display(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Cart count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Form Types
// =============================================================================

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Only the detail page sends a quantity. Kept raw: a cleared number
    /// input submits an empty string.
    pub quantity: Option<String>,
    pub return_to: Option<String>,
}

/// Quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
    pub return_to: Option<String>,
}

/// Remove form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
    pub return_to: Option<String>,
}

/// Clear form data.
#[derive(Debug, Deserialize)]
pub struct ClearCartForm {
    pub return_to: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(storage))]
pub async fn show(storage: ClientStorage) -> Response {
    if current_user(&storage).is_none() {
        return Redirect::to(LOGIN_PATH).into_response();
    }

    let cart = load_cart(&storage);

    CartShowTemplate {
        page: PageContext::build(&storage).await,
        cart: CartView::from(&cart),
    }
    .into_response()
}

/// Add a product to the cart.
#[instrument(skip(state, storage))]
pub async fn add(
    State(state): State<AppState>,
    mut storage: ClientStorage,
    form: Result<Form<AddToCartForm>, FormRejection>,
) -> Result<Response, AppError> {
    if current_user(&storage).is_none() {
        toast::show(
            storage.session(),
            Toast::warning(LOGIN_REQUIRED_MESSAGE).with_duration(LOGIN_REQUIRED_DURATION_MS),
        )
        .await;
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }

    let Form(form) = form?;
    let destination = safe_return_to(form.return_to.as_deref());

    let Ok(id) = form.product_id.parse::<ProductId>() else {
        toast::show(storage.session(), Toast::error("Product not found")).await;
        return Ok(Redirect::to(&destination).into_response());
    };

    let product = match state.catalog().get_product(id).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!("Failed to fetch product {id} for cart: {e}");
            let message = if e.is_not_found() {
                "Product not found"
            } else {
                "Could not add to cart. Please try again."
            };
            toast::show(storage.session(), Toast::error(message)).await;
            return Ok(Redirect::to(&destination).into_response());
        }
    };

    if !product.stock_level().in_stock() {
        toast::show(
            storage.session(),
            Toast::warning(format!("{} is out of stock", product.title)),
        )
        .await;
        return Ok(Redirect::to(&destination).into_response());
    }

    let quantity = requested_quantity(form.quantity.as_deref()).clamp(1, product.stock);

    let mut cart = load_cart(&storage);
    cart.add_many(&product, quantity);
    save_cart_or_log(&mut storage, &cart);
    storage.commit_or_log().await;

    crate::error::add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product_id", &id.to_string()),
            ("quantity", &quantity.to_string()),
        ]),
    );

    let message = if form.quantity.is_some() {
        items_added_message(quantity)
    } else {
        format!("{} added to cart!", product.title)
    };
    toast::show(storage.session(), Toast::success(message)).await;

    Ok(Redirect::to(&destination).into_response())
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(storage))]
pub async fn update(
    mut storage: ClientStorage,
    form: Result<Form<UpdateCartForm>, FormRejection>,
) -> Result<Response, AppError> {
    if current_user(&storage).is_none() {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }
    let Form(form) = form?;

    let destination = safe_return_to(form.return_to.as_deref());
    let Ok(id) = form.product_id.parse::<ProductId>() else {
        return Ok(Redirect::to(&destination).into_response());
    };

    let mut cart = load_cart(&storage);
    let outcome = cart.update_quantity(id, form.quantity);
    if outcome != QuantityUpdate::NotInCart {
        save_cart_or_log(&mut storage, &cart);
        storage.commit_or_log().await;
    }
    if outcome == QuantityUpdate::Updated {
        toast::show(storage.session(), Toast::info("Quantity updated")).await;
    }

    Ok(Redirect::to(&destination).into_response())
}

/// Remove a line from the cart.
#[instrument(skip(storage))]
pub async fn remove(
    mut storage: ClientStorage,
    form: Result<Form<RemoveFromCartForm>, FormRejection>,
) -> Result<Response, AppError> {
    if current_user(&storage).is_none() {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }
    let Form(form) = form?;

    let destination = safe_return_to(form.return_to.as_deref());
    let Ok(id) = form.product_id.parse::<ProductId>() else {
        return Ok(Redirect::to(&destination).into_response());
    };

    let mut cart = load_cart(&storage);
    if let Some(item) = cart.remove(id) {
        save_cart_or_log(&mut storage, &cart);
        storage.commit_or_log().await;
        toast::show(
            storage.session(),
            Toast::success(format!("{} removed from cart", item.product.title)),
        )
        .await;
    }

    Ok(Redirect::to(&destination).into_response())
}

/// Empty the cart.
#[instrument(skip(storage))]
pub async fn clear(
    mut storage: ClientStorage,
    form: Result<Form<ClearCartForm>, FormRejection>,
) -> Result<Response, AppError> {
    if current_user(&storage).is_none() {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }
    let Form(form) = form?;

    let mut cart = load_cart(&storage);
    cart.clear();
    save_cart_or_log(&mut storage, &cart);
    storage.commit_or_log().await;
    toast::show(storage.session(), Toast::info("Cart cleared")).await;

    Ok(Redirect::to(&safe_return_to(form.return_to.as_deref())).into_response())
}

/// Cart badge fragment.
#[instrument(skip(storage))]
pub async fn count(storage: ClientStorage) -> impl IntoResponse {
    CartCountTemplate {
        count: load_cart(&storage).total_items(),
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Quantity from the add form; blank or unparseable means 1.
fn requested_quantity(raw: Option<&str>) -> u32 {
    raw.map(str::trim)
        .and_then(|q| q.parse::<u32>().ok())
        .unwrap_or(1)
}

/// "1 item added to cart!" / "3 items added to cart!"
fn items_added_message(quantity: u32) -> String {
    let noun = if quantity == 1 { "item" } else { "items" };
    format!("{quantity} {noun} added to cart!")
}

/// Redirect target from a form, restricted to paths on this site.
///
/// Falls back to `/cart` for anything absent, absolute, or protocol-relative.
#[must_use]
pub fn safe_return_to(return_to: Option<&str>) -> String {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => "/cart".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    #[test]
    fn test_safe_return_to() {
        assert_eq!(safe_return_to(Some("/products?sort=l2h")), "/products?sort=l2h");
        assert_eq!(safe_return_to(Some("/")), "/");
        assert_eq!(safe_return_to(None), "/cart");
        assert_eq!(safe_return_to(Some("")), "/cart");
        assert_eq!(safe_return_to(Some("https://evil.example")), "/cart");
        assert_eq!(safe_return_to(Some("//evil.example")), "/cart");
        assert_eq!(safe_return_to(Some("/\\evil.example")), "/cart");
    }

    #[test]
    fn test_items_added_message() {
        assert_eq!(items_added_message(1), "1 item added to cart!");
        assert_eq!(items_added_message(3), "3 items added to cart!");
    }

    #[test]
    fn test_requested_quantity() {
        assert_eq!(requested_quantity(None), 1);
        assert_eq!(requested_quantity(Some("")), 1);
        assert_eq!(requested_quantity(Some("  ")), 1);
        assert_eq!(requested_quantity(Some("abc")), 1);
        assert_eq!(requested_quantity(Some("-2")), 1);
        assert_eq!(requested_quantity(Some(" 4 ")), 4);
    }

    #[test]
    fn test_cart_view() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 3,
            "title": "Powder Canister",
            "brand": "Velvet Touch",
            "price": 14.99,
            "discountPercentage": 18.14,
            "stock": 89
        }))
        .unwrap();
        let mut cart = Cart::new();
        cart.add_many(&product, 2);

        let view = CartView::from(&cart);
        assert_eq!(view.line_count, 1);
        assert_eq!(view.lines.len(), 1);
        let line = view.lines.first().unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.decrement, 1);
        assert_eq!(line.increment, 3);
        assert_eq!(line.price, "$12.27");
        assert_eq!(line.discount_badge, Some(18));
        assert_eq!(view.total, "$24.54");
    }
}
