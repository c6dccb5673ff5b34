//! Mock account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use glownest_core::UserId;

/// Avatar shown for accounts without a profile picture.
pub const DEFAULT_PROFILE_PICTURE: &str =
    "https://cdn.icon-icons.com/icons2/3150/PNG/512/user_profile_male_icon_192702.png";

fn default_profile_picture() -> String {
    DEFAULT_PROFILE_PICTURE.to_string()
}

/// A registered account as kept in the `allUsers` list.
///
/// The password is stored as entered. It is redacted from `Debug` output and
/// never copied into [`CurrentUser`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_profile_picture")]
    pub profile_picture: String,
    /// Month and year of registration, e.g. "October 2026".
    #[serde(default)]
    pub join_date: String,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a fresh account registered at `now`.
    #[must_use]
    pub fn new(name: String, email: String, password: String, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::from_timestamp(now),
            name,
            email,
            password,
            profile_picture: default_profile_picture(),
            join_date: now.format("%B %Y").to_string(),
            total_orders: 0,
            created_at: Some(now),
        }
    }

    /// The record without its password.
    #[must_use]
    pub fn to_current(&self) -> CurrentUser {
        CurrentUser {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            email: self.email.clone(),
            profile_picture: self.profile_picture.clone(),
            join_date: self.join_date.clone(),
            total_orders: self.total_orders,
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("profile_picture", &self.profile_picture)
            .field("join_date", &self.join_date)
            .field("total_orders", &self.total_orders)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// The logged-in account (`currentUser`).
///
/// Every field is optional on input; accessors supply the profile page
/// fallbacks for whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub profile_picture: String,
    pub join_date: String,
    pub total_orders: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CurrentUser {
    /// Name, or "User".
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty_or(&self.name, "User")
    }

    /// Email, or "No email".
    #[must_use]
    pub fn display_email(&self) -> &str {
        non_empty_or(&self.email, "No email")
    }

    /// Join date, or "Recently".
    #[must_use]
    pub fn display_join_date(&self) -> &str {
        non_empty_or(&self.join_date, "Recently")
    }

    /// Profile picture URL, or the default avatar.
    #[must_use]
    pub fn picture_url(&self) -> &str {
        non_empty_or(&self.profile_picture, DEFAULT_PROFILE_PICTURE)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
