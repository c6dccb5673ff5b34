//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::PageContext;
use crate::routes::products::ProductCardView;
use crate::services::cart::load_cart;
use crate::state::AppState;
use crate::storage::ClientStorage;

// =============================================================================
// Hero Configuration (static copy)
// =============================================================================

/// A headline number under the hero.
#[derive(Clone)]
pub struct HeroStat {
    pub value: &'static str,
    pub label: &'static str,
}

/// Static hero content.
#[derive(Clone)]
pub struct HeroConfig {
    pub badge: &'static str,
    pub title: &'static str,
    pub highlight: &'static str,
    pub subtitle: &'static str,
    pub benefits: &'static [&'static str],
    pub stats: &'static [HeroStat],
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            badge: "Premium Quality Products",
            title: "Shop Smarter,",
            highlight: "Live Better",
            subtitle: "Find everything you need in one place. From everyday essentials to \
                       luxury items, we've got you covered with the best prices and quality.",
            benefits: &[
                "Premium Quality Guaranteed",
                "Best Prices in the Market",
                "Fast & Free Delivery",
            ],
            stats: &[
                HeroStat {
                    value: "10K+",
                    label: "Happy Customers",
                },
                HeroStat {
                    value: "5K+",
                    label: "Products Available",
                },
                HeroStat {
                    value: "100%",
                    label: "Satisfaction Guarantee",
                },
            ],
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub hero: HeroConfig,
    pub featured_products: Vec<ProductCardView>,
    pub show_tags: bool,
    pub return_to: &'static str,
}

/// Display the home page.
#[instrument(skip(state, storage))]
pub async fn home(State(state): State<AppState>, storage: ClientStorage) -> impl IntoResponse {
    let products = match state.catalog().list_products().await {
        Ok(list) => list.products,
        Err(e) => {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        }
    };

    let cart = load_cart(&storage);
    let featured_products = products
        .iter()
        .take(state.config().featured_count)
        .map(|p| ProductCardView::new(p, &cart))
        .collect();

    HomeTemplate {
        page: PageContext::build(&storage).await,
        hero: HeroConfig::default(),
        featured_products,
        show_tags: false,
        return_to: "/",
    }
}
