//! Login and sign-up form validation.
//!
//! Runs before the account service is called. Each field gets at most one
//! message; the first failing rule wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Loose email shape check: something, `@`, something, `.`, something.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Invalid regex"));

/// Per-field validation messages. `None` means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
}

impl FieldErrors {
    /// Whether every field passed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
    }
}

/// Login form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginInput {
    /// Check the form.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            email: check_email(&self.email),
            password: check_password(&self.password),
            ..FieldErrors::default()
        }
    }
}

/// Sign-up form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterInput {
    /// Check the form.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let confirm_password = if self.confirm_password.is_empty() {
            Some("Please confirm your password")
        } else if self.confirm_password != self.password {
            Some("Passwords do not match")
        } else {
            None
        };

        FieldErrors {
            name: self.name.trim().is_empty().then_some("Name is required"),
            email: check_email(&self.email),
            password: check_password(&self.password),
            confirm_password,
        }
    }
}

fn check_email(email: &str) -> Option<&'static str> {
    if email.trim().is_empty() {
        Some("Email is required")
    } else if !EMAIL_RE.is_match(email) {
        Some("Email is invalid")
    } else {
        None
    }
}

fn check_password(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Password is required")
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some("Password must be at least 6 characters")
    } else {
        None
    }
}
