//! Integration tests for GlowNest.
//!
//! Each test starts the full storefront router on an ephemeral port, with
//! the catalog API stubbed by `wiremock`, and drives it over HTTP with a
//! cookie-keeping `reqwest` client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p glownest-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::time::Duration;

use glownest_storefront::config::{CatalogConfig, StorefrontConfig};
use glownest_storefront::state::AppState;
use reqwest::{Client, Response, redirect};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running storefront plus its stubbed catalog.
pub struct TestContext {
    /// Visitor with its own cookie jar. Redirects are not followed.
    pub client: Client,
    pub base_url: String,
    pub catalog: MockServer,
}

impl TestContext {
    /// Start a storefront backed by the default catalog fixtures.
    pub async fn new() -> Self {
        let catalog = MockServer::start().await;
        mount_catalog(&catalog).await;
        Self::with_catalog(catalog).await
    }

    /// Start a storefront against an already configured mock catalog.
    pub async fn with_catalog(catalog: MockServer) -> Self {
        let config = config_for(&catalog);
        Self::start(catalog, config).await
    }

    /// Start a storefront that trusts forwarded client IP headers, as it
    /// would behind a reverse proxy.
    pub async fn behind_proxy() -> Self {
        let catalog = MockServer::start().await;
        mount_catalog(&catalog).await;
        let config = StorefrontConfig {
            trust_proxy_headers: true,
            ..config_for(&catalog)
        };
        Self::start(catalog, config).await
    }

    async fn start(catalog: MockServer, config: StorefrontConfig) -> Self {
        let state = AppState::new(config).unwrap();
        let app = glownest_storefront::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self {
            client: new_client(),
            base_url: format!("http://{addr}"),
            catalog,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// GET a page and return its body.
    pub async fn page(&self, path: &str) -> String {
        self.get(path).await.text().await.unwrap()
    }

    /// Sign up and log in as a fresh account.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Response {
        self.post_form(
            "/auth/register",
            &[
                ("name", name),
                ("email", email),
                ("password", password),
                ("confirm_password", password),
            ],
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/auth/login", &[("email", email), ("password", password)])
            .await
    }
}

fn config_for(catalog: &MockServer) -> StorefrontConfig {
    StorefrontConfig {
        catalog: CatalogConfig {
            base_url: catalog.uri(),
            timeout: Duration::from_secs(5),
        },
        ..StorefrontConfig::default()
    }
}

/// A client with its own cookie jar that does not follow redirects.
#[must_use]
pub fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .unwrap()
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// =============================================================================
// Catalog fixtures
// =============================================================================

/// Mascara: beauty, $9.99, 7.17% off, 5 in stock.
#[must_use]
pub fn mascara() -> Value {
    json!({
        "id": 1,
        "title": "Essence Mascara Lash Princess",
        "description": "Popular mascara known for volumizing effects.",
        "category": "beauty",
        "price": 9.99,
        "discountPercentage": 7.17,
        "rating": 4.94,
        "stock": 5,
        "tags": ["beauty", "mascara"],
        "brand": "Essence",
        "sku": "RCH45Q1A",
        "weight": 2,
        "warrantyInformation": "1 month warranty",
        "shippingInformation": "Ships in 1 month",
        "reviews": [
            {
                "rating": 2,
                "comment": "Very unhappy with my purchase",
                "date": "2024-05-23T08:56:21.618Z",
                "reviewerName": "John Doe",
                "reviewerEmail": "john.doe@x.dummyjson.com"
            }
        ],
        "returnPolicy": "30 days return policy",
        "images": ["https://cdn.dummyjson.com/products/images/beauty/mascara/1.png"],
        "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/mascara/thumbnail.png"
    })
}

/// Perfume: fragrances, $49.99, no discount, 23 in stock.
#[must_use]
pub fn perfume() -> Value {
    json!({
        "id": 2,
        "title": "Calvin Klein CK One",
        "description": "A classic unisex fragrance.",
        "category": "fragrances",
        "price": 49.99,
        "discountPercentage": 0,
        "rating": 4.37,
        "stock": 23,
        "tags": ["fragrances", "perfumes"],
        "brand": "Calvin Klein",
        "images": [],
        "thumbnail": "https://cdn.dummyjson.com/products/images/fragrances/ck-one/thumbnail.png"
    })
}

/// Powder: beauty, $14.99, sold out.
#[must_use]
pub fn powder() -> Value {
    json!({
        "id": 3,
        "title": "Powder Canister",
        "description": "Lightweight setting powder.",
        "category": "beauty",
        "price": 14.99,
        "discountPercentage": 18.14,
        "rating": 3.82,
        "stock": 0,
        "tags": ["beauty", "face powder"],
        "brand": "Velvet Touch",
        "images": [],
        "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/powder/thumbnail.png"
    })
}

/// Stub the listing, categories and per-product endpoints.
///
/// Unknown product IDs fall through to wiremock's default 404.
pub async fn mount_catalog(server: &MockServer) {
    let products = [mascara(), perfume(), powder()];

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": products,
            "total": 3,
            "skip": 0,
            "limit": 30
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"slug": "beauty", "name": "Beauty", "url": "https://dummyjson.com/products/category/beauty"},
            {"slug": "fragrances", "name": "Fragrances", "url": "https://dummyjson.com/products/category/fragrances"}
        ])))
        .mount(server)
        .await;

    for product in products {
        let id = product.get("id").and_then(Value::as_i64).unwrap();
        Mock::given(method("GET"))
            .and(path(format!("/products/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(product))
            .mount(server)
            .await;
    }
}
