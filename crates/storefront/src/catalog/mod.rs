//! Product catalog API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTPS with `reqwest`
//! - The catalog is the source of truth: no local copy, no cache
//! - One attempt per call with a request timeout; failures surface as
//!   [`CatalogError`] and callers fall back to empty views
//!
//! # Endpoints
//!
//! | Call                 | Request                     |
//! |----------------------|-----------------------------|
//! | `list_products`      | `GET /products`             |
//! | `get_product`        | `GET /products/{id}`        |
//! | `list_categories`    | `GET /products/categories`  |
//!
//! # Example
//!
//! ```rust,ignore
//! use glownest_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let products = client.list_products().await?.products;
//! let product = client.get_product(ProductId::new(1)).await?;
//! ```

mod client;
pub mod types;

pub use client::CatalogClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body, for diagnostics.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// Whether the error means the resource does not exist, as opposed to the
    /// catalog being unavailable.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_error_display() {
        let err = CatalogError::Status {
            status: 503,
            body: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected status 503: upstream down");
        assert!(!err.is_not_found());
    }
}
