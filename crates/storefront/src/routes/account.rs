//! Profile route handler.
//!
//! Requires an auth token.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::CurrentUser;
use crate::services::auth::current_user;

/// Profile display data, with fallbacks applied.
#[derive(Clone)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub join_date: String,
    pub picture_url: String,
    pub total_orders: u32,
}

impl From<&CurrentUser> for ProfileView {
    fn from(user: &CurrentUser) -> Self {
        Self {
            name: user.display_name().to_string(),
            email: user.display_email().to_string(),
            join_date: user.display_join_date().to_string(),
            picture_url: user.picture_url().to_string(),
            total_orders: user.total_orders,
        }
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub page: PageContext,
    pub user: ProfileView,
}

/// Display the profile page.
///
/// An auth token without a readable `currentUser` shows the defaults.
#[instrument(skip_all)]
pub async fn profile(RequireAuth(storage): RequireAuth) -> impl IntoResponse {
    let user = current_user(&storage).unwrap_or_default();

    ProfileTemplate {
        page: PageContext::build(&storage).await,
        user: ProfileView::from(&user),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_PROFILE_PICTURE;

    #[test]
    fn test_profile_view_defaults() {
        let view = ProfileView::from(&CurrentUser::default());
        assert_eq!(view.name, "User");
        assert_eq!(view.email, "No email");
        assert_eq!(view.join_date, "Recently");
        assert_eq!(view.picture_url, DEFAULT_PROFILE_PICTURE);
        assert_eq!(view.total_orders, 0);
    }

    #[test]
    fn test_profile_view_from_record() {
        let user = CurrentUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            join_date: "October 2026".to_string(),
            total_orders: 2,
            ..CurrentUser::default()
        };
        let view = ProfileView::from(&user);
        assert_eq!(view.name, "Ada");
        assert_eq!(view.email, "ada@example.com");
        assert_eq!(view.join_date, "October 2026");
        assert_eq!(view.total_orders, 2);
    }
}
