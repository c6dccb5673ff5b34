//! Login, sign-up and logout handlers.
//!
//! Both forms live on `/register`; `?mode=signup` switches to the sign-up
//! form. Failed submissions re-render the form with per-field messages and
//! the entered name and email. Passwords are never echoed back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{LOGIN_PATH, PageContext};
use crate::models::CurrentUser;
use crate::services::auth::{
    AuthError, AuthService, FieldErrors, LOGIN_SUCCESS, LoginInput, REGISTER_SUCCESS,
    RegisterInput,
};
use crate::services::toast::{self, Toast};
use crate::storage::ClientStorage;

/// Which form the auth page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    /// Parse the `mode` query value; anything but `signup` means login.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("signup") => Self::Signup,
            _ => Self::Login,
        }
    }

    #[must_use]
    pub const fn is_login(&self) -> bool {
        matches!(self, Self::Login)
    }
}

/// Values put back into a re-rendered form.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub name: String,
    pub email: String,
}

/// Login/sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub is_login: bool,
    pub values: FormValues,
    pub errors: FieldErrors,
    pub form_error: Option<String>,
}

/// Auth page query parameters.
#[derive(Debug, Deserialize)]
pub struct ModeQuery {
    pub mode: Option<String>,
}

/// Display the login or sign-up form, or the logged-in notice.
#[instrument(skip(storage))]
pub async fn register_page(storage: ClientStorage, Query(query): Query<ModeQuery>) -> impl IntoResponse {
    let mode = AuthMode::from_param(query.mode.as_deref());

    RegisterTemplate {
        page: PageContext::build(&storage).await,
        is_login: mode.is_login(),
        values: FormValues::default(),
        errors: FieldErrors::default(),
        form_error: None,
    }
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(mut storage: ClientStorage, Form(input): Form<LoginInput>) -> Response {
    let values = FormValues {
        name: String::new(),
        email: input.email.clone(),
    };

    let errors = input.validate();
    if !errors.is_empty() {
        return render_failure(&storage, AuthMode::Login, values, errors, None).await;
    }

    let result = AuthService::new(&mut storage).login(&input.email, &input.password);
    match result {
        Ok(user) => complete_sign_in(&mut storage, &user, LOGIN_SUCCESS).await,
        Err(e) => auth_failure(&storage, AuthMode::Login, values, &e).await,
    }
}

/// Handle sign-up form submission.
#[instrument(skip_all)]
pub async fn register(mut storage: ClientStorage, Form(input): Form<RegisterInput>) -> Response {
    let values = FormValues {
        name: input.name.clone(),
        email: input.email.clone(),
    };

    let errors = input.validate();
    if !errors.is_empty() {
        return render_failure(&storage, AuthMode::Signup, values, errors, None).await;
    }

    let result = AuthService::new(&mut storage).register(&input.name, &input.email, &input.password);
    match result {
        Ok(user) => complete_sign_in(&mut storage, &user, REGISTER_SUCCESS).await,
        Err(e) => auth_failure(&storage, AuthMode::Signup, values, &e).await,
    }
}

/// Handle logout.
#[instrument(skip(storage))]
pub async fn logout(mut storage: ClientStorage) -> impl IntoResponse {
    AuthService::new(&mut storage).logout();
    storage.commit_or_log().await;
    clear_sentry_user();

    Redirect::to(LOGIN_PATH)
}

// =============================================================================
// Helpers
// =============================================================================

async fn complete_sign_in(storage: &mut ClientStorage, user: &CurrentUser, message: &str) -> Response {
    storage.commit_or_log().await;

    if let Some(id) = &user.id {
        set_sentry_user(id, Some(&user.email));
    }
    toast::show(storage.session(), Toast::success(message)).await;

    Redirect::to("/").into_response()
}

async fn auth_failure(
    storage: &ClientStorage,
    mode: AuthMode,
    values: FormValues,
    error: &AuthError,
) -> Response {
    if !error.is_storage_failure() {
        tracing::info!(%error, "Authentication rejected");
    }
    render_failure(storage, mode, values, FieldErrors::default(), Some(error.to_string())).await
}

/// Re-render the form with a 422.
///
/// A form-level failure is also shown as an error toast on this render.
async fn render_failure(
    storage: &ClientStorage,
    mode: AuthMode,
    values: FormValues,
    errors: FieldErrors,
    form_error: Option<String>,
) -> Response {
    let mut page = PageContext::build(storage).await;
    if let Some(message) = &form_error {
        page.toasts.push(Toast::error(message.clone()));
    }

    (
        StatusCode::UNPROCESSABLE_ENTITY,
        RegisterTemplate {
            page,
            is_login: mode.is_login(),
            values,
            errors,
            form_error,
        },
    )
        .into_response()
}
