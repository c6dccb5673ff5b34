//! Per-client key-value storage.
//!
//! Every visitor owns one string-to-string store with browser `localStorage`
//! semantics: last write wins, values are opaque text (JSON by convention),
//! and the total size is capped by a quota.
//!
//! - [`KeyValueStore`] is the trait services are written against
//! - [`MemoryStorage`] is the plain in-memory implementation
//! - [`ClientStorage`] loads a visitor's store from their session and writes
//!   it back after changes; it is also an axum extractor

mod client;
mod memory;

pub use client::ClientStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Keys used in the per-client store.
pub mod keys {
    /// The logged-in user (without password).
    pub const CURRENT_USER: &str = "currentUser";

    /// Every account registered from this client.
    pub const ALL_USERS: &str = "allUsers";

    /// Email of the logged-in user.
    pub const AUTH_TOKEN: &str = "authToken";

    /// Cart line items.
    pub const CART: &str = "cart";
}

/// Errors from the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the value would take the store over its quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write.
        needed: usize,
        /// Configured maximum.
        quota: usize,
    },

    /// A value could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// A string key-value store.
pub trait KeyValueStore {
    /// Value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::QuotaExceeded` if the store would grow past its
    /// quota. The previous value is kept in that case.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete `key`. Missing keys are ignored.
    fn remove_item(&mut self, key: &str);

    /// Delete every key.
    fn clear(&mut self);

    /// Encode `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the quota would be exceeded.
    fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError>
    where
        Self: Sized,
    {
        let encoded = serde_json::to_string(value)?;
        self.set_item(key, encoded)
    }

    /// Decode the JSON stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the stored text is not valid JSON for `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error>
    where
        Self: Sized,
    {
        self.get_item(key)
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
    }
}
