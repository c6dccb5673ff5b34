//! Session-backed per-client store.

use std::collections::HashMap;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::{KeyValueStore, MemoryStorage, StorageError};
use crate::error::AppError;
use crate::state::AppState;

/// Session key holding the serialized store.
pub const SESSION_KEY: &str = "client_storage";

/// A visitor's key-value store for the duration of one request.
///
/// Reads and writes hit an in-memory copy; call [`ClientStorage::commit`]
/// (or [`ClientStorage::commit_or_log`]) after mutating to persist the
/// changes into the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut storage: ClientStorage) -> impl IntoResponse {
///     storage.remove_item(keys::CART);
///     storage.commit_or_log().await;
/// }
/// ```
pub struct ClientStorage {
    session: Session,
    store: MemoryStorage,
    dirty: bool,
}

impl ClientStorage {
    /// Load the store saved in `session`, capped at `quota` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(session: Session, quota: usize) -> Result<Self, StorageError> {
        let entries: HashMap<String, String> = session.get(SESSION_KEY).await?.unwrap_or_default();

        Ok(Self {
            session,
            store: MemoryStorage::from_entries(entries, Some(quota)),
            dirty: false,
        })
    }

    /// Write pending changes back into the session.
    ///
    /// Does nothing when nothing changed since loading or the last commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn commit(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        self.session.insert(SESSION_KEY, self.store.entries()).await?;
        self.dirty = false;
        Ok(())
    }

    /// Commit, logging instead of returning a failure.
    pub async fn commit_or_log(&mut self) {
        if let Err(e) = self.commit().await {
            tracing::error!(error = %e, "Failed to save client storage");
        }
    }

    /// Whether there are uncommitted changes.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The session this store is saved in.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

impl KeyValueStore for ClientStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.store.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.store.set_item(key, value)?;
        self.dirty = true;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        if self.store.get_item(key).is_some() {
            self.store.remove_item(key);
            self.dirty = true;
        }
    }

    fn clear(&mut self) {
        if !self.store.is_empty() {
            self.store.clear();
            self.dirty = true;
        }
    }
}

impl FromRequestParts<AppState> for ClientStorage {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        Ok(Self::load(session, state.config().storage_quota_bytes).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::storage::keys;

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_commit_persists_into_session() {
        let session = new_session();

        let mut storage = ClientStorage::load(session.clone(), 1024).await.unwrap();
        storage
            .set_item(keys::AUTH_TOKEN, "ada@example.com".to_string())
            .unwrap();
        assert!(storage.is_dirty());
        storage.commit().await.unwrap();
        assert!(!storage.is_dirty());

        let reloaded = ClientStorage::load(session, 1024).await.unwrap();
        assert_eq!(
            reloaded.get_item(keys::AUTH_TOKEN).as_deref(),
            Some("ada@example.com")
        );
    }

    #[tokio::test]
    async fn test_uncommitted_changes_are_not_saved() {
        let session = new_session();

        let mut storage = ClientStorage::load(session.clone(), 1024).await.unwrap();
        storage.set_item(keys::CART, "[]".to_string()).unwrap();
        drop(storage);

        let reloaded = ClientStorage::load(session, 1024).await.unwrap();
        assert!(reloaded.get_item(keys::CART).is_none());
    }

    #[tokio::test]
    async fn test_removing_missing_key_stays_clean() {
        let mut storage = ClientStorage::load(new_session(), 1024).await.unwrap();
        storage.remove_item(keys::CURRENT_USER);
        storage.clear();
        assert!(!storage.is_dirty());
    }

    #[tokio::test]
    async fn test_quota_applies_to_loaded_store() {
        let mut storage = ClientStorage::load(new_session(), 8).await.unwrap();
        let err = storage
            .set_item(keys::CART, "[1,2,3,4]".to_string())
            .unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 8, .. }));
        assert!(!storage.is_dirty());
    }
}
