//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog reachable)
//!
//! # Products
//! GET  /products               - Product listing (?category=, ?sort=none|l2h|h2l)
//! GET  /products/{id}          - Product detail (?image=)
//!
//! # Cart (logged in only)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart
//! POST /cart/update            - Set line quantity
//! POST /cart/remove            - Remove line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Auth
//! GET  /register               - Login form (?mode=signup for sign-up)
//! POST /auth/login             - Login action (rate limited)
//! POST /auth/register          - Sign-up action (rate limited)
//! POST /auth/logout            - Logout action
//!
//! # Requires an auth token
//! GET  /profile                - Profile page
//! GET  /about                  - About page
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod health;
pub mod home;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// `trust_proxy_headers` decides whether the rate limiter keys clients by
/// forwarded headers or by peer address.
pub fn auth_routes(trust_proxy_headers: bool) -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            post(auth::login).layer(auth_rate_limiter(trust_proxy_headers)),
        )
        .route(
            "/register",
            post(auth::register).layer(auth_rate_limiter(trust_proxy_headers)),
        )
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::ready))
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Login and sign-up page
        .route("/register", get(auth::register_page))
        // Auth actions
        .nest("/auth", auth_routes(config.trust_proxy_headers))
        // Protected pages
        .route("/profile", get(account::profile))
        .route("/about", get(pages::about))
        // Health checks
        .nest("/health", health_routes())
}
