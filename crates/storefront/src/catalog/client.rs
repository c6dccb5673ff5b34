//! HTTP client for the catalog REST API.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use glownest_core::ProductId;

use super::CatalogError;
use super::types::{Category, Product, ProductList};
use crate::config::CatalogConfig;

/// Bytes of an error body kept for logs and error values.
const BODY_PREVIEW_CHARS: usize = 500;

/// Client for the product catalog API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialization failure).
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("glownest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Fetch the default product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<ProductList, CatalogError> {
        let list: ProductList = self.get_json("/products").await?;
        debug!(count = list.products.len(), total = list.total, "Fetched products");
        Ok(list)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product, or
    /// another error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_json(&format!("/products/{id}")).await
    }

    /// Fetch all product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let categories: Vec<Category> = self.get_json("/products/categories").await?;
        debug!(count = categories.len(), "Fetched categories");
        Ok(categories)
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(%url, "Catalog resource not found");
            return Err(CatalogError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let body = preview(&response_text);
            tracing::error!(
                status = %status,
                body = %body,
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&response_text),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
