//! Authentication extractors.
//!
//! "Authentication" here means the visitor's own store holds an `authToken`.
//! Nothing is verified server-side.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::AppError;
use crate::services::auth::has_auth_token;
use crate::state::AppState;
use crate::storage::ClientStorage;

/// Where visitors without an auth token are sent.
pub const LOGIN_PATH: &str = "/register";

/// Extractor that requires an auth token.
///
/// Yields the visitor's loaded storage so handlers need not load it twice.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(storage): RequireAuth) -> impl IntoResponse {
///     let user = current_user(&storage);
/// }
/// ```
pub struct RequireAuth(pub ClientStorage);

/// Rejection for [`RequireAuth`].
pub enum AuthRejection {
    /// No auth token; go to the login page.
    RedirectToLogin,
    /// Storage could not be loaded.
    Storage(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Storage(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let storage = ClientStorage::from_request_parts(parts, state)
            .await
            .map_err(AuthRejection::Storage)?;

        if !has_auth_token(&storage) {
            tracing::debug!(path = %parts.uri.path(), "No auth token, redirecting to login");
            return Err(AuthRejection::RedirectToLogin);
        }

        Ok(Self(storage))
    }
}
