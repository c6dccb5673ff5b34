//! Authentication error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Ways registration or login can fail.
///
/// The `Display` text is the message shown to the visitor.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An account with this email already exists.
    #[error("Email already registered. Please login instead.")]
    EmailTaken,

    /// No account with this email.
    #[error("User not found. Please check your email.")]
    UserNotFound,

    /// The account exists but the password differs.
    #[error("Incorrect password. Please try again.")]
    IncorrectPassword,

    /// Registration could not be saved.
    #[error("Registration failed. Please try again.")]
    RegistrationFailed(#[source] StorageError),

    /// Login state could not be saved.
    #[error("Login failed. Please try again.")]
    LoginFailed(#[source] StorageError),
}

impl AuthError {
    /// Whether the failure came from storage rather than the visitor's input.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self, Self::RegistrationFailed(_) | Self::LoginFailed(_))
    }
}
