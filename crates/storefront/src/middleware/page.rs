//! Per-page layout data.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::services::auth::current_user;
use crate::services::cart::load_cart;
use crate::services::toast::{self, Toast};
use crate::state::AppState;
use crate::storage::ClientStorage;

/// What the shared layout (navbar, toasts) needs on every page.
///
/// Building one drains the visitor's toast queue, so build it once per
/// rendered page and only for pages that are actually rendered.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Whether `currentUser` is present.
    pub logged_in: bool,
    /// Navbar name, "User" when the record has none.
    pub user_name: String,
    /// Cart badge count (sum of quantities).
    pub cart_count: u32,
    /// Toasts to show on this page.
    pub toasts: Vec<Toast>,
}

impl PageContext {
    /// Build the context from an already loaded store.
    pub async fn build(storage: &ClientStorage) -> Self {
        let user = current_user(storage);
        let cart_count = load_cart(storage).total_items();
        let toasts = toast::drain(storage.session()).await;

        Self {
            logged_in: user.is_some(),
            user_name: user
                .as_ref()
                .map_or_else(String::new, |u| u.display_name().to_string()),
            cart_count,
            toasts,
        }
    }

    /// Cart badge text: empty when the cart is, "9+" past nine.
    #[must_use]
    pub fn badge_label(&self) -> String {
        match self.cart_count {
            0 => String::new(),
            1..=9 => self.cart_count.to_string(),
            _ => "9+".to_string(),
        }
    }
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let storage = ClientStorage::from_request_parts(parts, state).await?;
        Ok(Self::build(&storage).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::{MemoryStore, Session};

    use super::*;
    use crate::services::auth::AuthService;

    #[tokio::test]
    async fn test_build_for_logged_in_visitor() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut storage = ClientStorage::load(session.clone(), 1 << 20).await.unwrap();
        AuthService::new(&mut storage)
            .register("Grace", "grace@example.com", "cobol59")
            .unwrap();
        toast::show(&session, Toast::success("Account created successfully!")).await;

        let page = PageContext::build(&storage).await;
        assert!(page.logged_in);
        assert_eq!(page.user_name, "Grace");
        assert_eq!(page.cart_count, 0);
        assert_eq!(page.toasts.len(), 1);
        assert_eq!(page.toasts[0].message, "Account created successfully!");

        let again = PageContext::build(&storage).await;
        assert!(again.toasts.is_empty());
    }

    #[tokio::test]
    async fn test_build_for_guest() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let storage = ClientStorage::load(session, 1 << 20).await.unwrap();

        let page = PageContext::build(&storage).await;
        assert!(!page.logged_in);
        assert!(page.user_name.is_empty());
        assert_eq!(page.badge_label(), "");
    }

    #[test]
    fn test_badge_label() {
        let badge = |cart_count| PageContext {
            cart_count,
            ..PageContext::default()
        }
        .badge_label();
        assert_eq!(badge(3), "3");
        assert_eq!(badge(9), "9");
        assert_eq!(badge(10), "9+");
    }
}
