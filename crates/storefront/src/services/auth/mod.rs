//! Mock account service.
//!
//! Accounts live in the visitor's own key-value store: `allUsers` holds every
//! account registered from that client, `currentUser` the logged-in account
//! without its password, and `authToken` the logged-in email. Logging in is a
//! lookup against data the client wrote itself; nothing is verified
//! server-side.

mod error;
pub mod validation;

pub use error::AuthError;
pub use validation::{FieldErrors, LoginInput, RegisterInput};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::models::{CurrentUser, User};
use crate::storage::{KeyValueStore, StorageError, keys};

/// Toast shown after a successful registration.
pub const REGISTER_SUCCESS: &str = "Account created successfully!";

/// Toast shown after a successful login.
pub const LOGIN_SUCCESS: &str = "Login successful!";

/// Authentication service over a client's key-value store.
pub struct AuthService<'a, S: KeyValueStore> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore> AuthService<'a, S> {
    /// Create a service over `store`.
    pub const fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Register an account and log it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email is already registered, or
    /// `AuthError::RegistrationFailed` if the store rejects the write.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<CurrentUser, AuthError> {
        self.register_at(name, email, password, Utc::now())
    }

    /// [`AuthService::register`] with an explicit registration instant.
    ///
    /// # Errors
    ///
    /// See [`AuthService::register`].
    pub fn register_at(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<CurrentUser, AuthError> {
        let mut users = self.all_users();
        if users.iter().any(|user| user.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let user = User::new(name.to_string(), email.to_string(), password.to_string(), now);
        let current = user.to_current();
        users.push(user);

        self.store
            .set_json(keys::ALL_USERS, &users)
            .and_then(|()| self.start_session(&current))
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to save registration");
                AuthError::RegistrationFailed(e)
            })?;

        info!(user_id = ?current.id, "Account registered");
        Ok(current)
    }

    /// Log in with an email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` or `AuthError::IncorrectPassword` for
    /// bad credentials, or `AuthError::LoginFailed` if the store rejects the
    /// write.
    pub fn login(&mut self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let users = self.all_users();
        let user = users
            .iter()
            .find(|user| user.email == email)
            .ok_or(AuthError::UserNotFound)?;

        if user.password != password {
            return Err(AuthError::IncorrectPassword);
        }

        let current = user.to_current();
        self.start_session(&current).map_err(|e| {
            tracing::error!(error = %e, "Failed to save login");
            AuthError::LoginFailed(e)
        })?;

        info!(user_id = ?current.id, "Logged in");
        Ok(current)
    }

    /// Log out. The cart is left alone.
    pub fn logout(&mut self) {
        self.store.remove_item(keys::CURRENT_USER);
        self.store.remove_item(keys::AUTH_TOKEN);
    }

    /// The logged-in account, if any.
    ///
    /// A corrupt record is logged and treated as logged out.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        current_user(&*self.store)
    }

    /// Whether an account is logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Whether an auth token is present.
    #[must_use]
    pub fn has_auth_token(&self) -> bool {
        has_auth_token(&*self.store)
    }

    /// Every registered account. Missing or corrupt data reads as none.
    #[must_use]
    pub fn all_users(&self) -> Vec<User> {
        match self.store.get_json::<Vec<User>>(keys::ALL_USERS) {
            Ok(users) => users.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable account list");
                Vec::new()
            }
        }
    }

    fn start_session(&mut self, current: &CurrentUser) -> Result<(), StorageError> {
        self.store.set_json(keys::CURRENT_USER, current)?;
        self.store
            .set_item(keys::AUTH_TOKEN, current.email.clone())
    }
}

/// Read `currentUser` from any store.
///
/// A corrupt record is logged and treated as logged out.
#[must_use]
pub fn current_user<S: KeyValueStore>(store: &S) -> Option<CurrentUser> {
    store
        .get_json::<CurrentUser>(keys::CURRENT_USER)
        .unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable current user");
            None
        })
}

/// Whether `authToken` is present in any store.
#[must_use]
pub fn has_auth_token<S: KeyValueStore>(store: &S) -> bool {
    store.get_item(keys::AUTH_TOKEN).is_some()
}
