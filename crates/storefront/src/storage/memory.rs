//! In-memory key-value store.

use std::collections::HashMap;

use super::{KeyValueStore, StorageError};

/// A `HashMap`-backed store with an optional byte quota.
///
/// Size is counted as the UTF-8 length of every key plus its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty store without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store capped at `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Rebuild a store from previously saved entries.
    ///
    /// Entries are accepted as-is even if they exceed the quota; only later
    /// writes are checked.
    #[must_use]
    pub const fn from_entries(entries: HashMap<String, String>, quota: Option<usize>) -> Self {
        Self { entries, quota }
    }

    /// All stored entries.
    #[must_use]
    pub const fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    /// Bytes currently used.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = MemoryStorage::new();
        assert!(store.get_item("cart").is_none());

        store.set_item("cart", "[]".to_string()).unwrap();
        assert_eq!(store.get_item("cart").as_deref(), Some("[]"));

        store.set_item("cart", "[1]".to_string()).unwrap();
        assert_eq!(store.get_item("cart").as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);

        store.remove_item("cart");
        store.remove_item("never-set");
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = MemoryStorage::new();
        store.set_item("a", "1".to_string()).unwrap();
        store.set_item("b", "2".to_string()).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.used_bytes(), 0);
    }

    #[test]
    fn test_quota_rejects_growth_and_keeps_old_value() {
        let mut store = MemoryStorage::with_quota(10);
        store.set_item("key", "1234567".to_string()).unwrap();
        assert_eq!(store.used_bytes(), 10);

        let err = store.set_item("key", "12345678".to_string()).unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 11,
                quota: 10
            }
        ));
        assert_eq!(store.get_item("key").as_deref(), Some("1234567"));
    }

    #[test]
    fn test_quota_counts_replacement_not_addition() {
        let mut store = MemoryStorage::with_quota(10);
        store.set_item("key", "1234567".to_string()).unwrap();
        // Same size replacement fits even though the store is full
        store.set_item("key", "7654321".to_string()).unwrap();
        assert!(store.set_item("k2", String::new()).is_err());
    }

    #[test]
    fn test_from_entries() {
        let entries = HashMap::from([("authToken".to_string(), "a@b.co".to_string())]);
        let store = MemoryStorage::from_entries(entries, Some(4));
        assert_eq!(store.get_item("authToken").as_deref(), Some("a@b.co"));
        assert_eq!(store.used_bytes(), 15);
    }
}
