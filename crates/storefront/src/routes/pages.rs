//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::{PageContext, RequireAuth};

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
}

/// Display the About page. Requires an auth token.
#[instrument(skip_all)]
pub async fn about(RequireAuth(storage): RequireAuth) -> impl IntoResponse {
    AboutTemplate {
        page: PageContext::build(&storage).await,
    }
}
