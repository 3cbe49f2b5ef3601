//! Typed storage wrapper with automatic serialization.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::store::{KeyValueStore, MemoryStore};
use crate::CacheError;

/// Type-safe view over a [`KeyValueStore`].
///
/// Values are stored as JSON text. Cloning a `Cache` shares the underlying
/// store.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap an existing store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// A cache over a fresh in-memory store.
    ///
    /// # Example
    ///
    /// ```
    /// let cache = shop_cache::Cache::memory();
    /// cache.set("wishlist", &vec!["p1".to_string()]).unwrap();
    /// let ids: Option<Vec<String>> = cache.get("wishlist").unwrap();
    /// assert_eq!(ids, Some(vec!["p1".to_string()]));
    /// ```
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Get a value, failing if the stored text is not valid JSON for `T`.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Get a value, treating anything unreadable as absent.
    ///
    /// A malformed value is deleted so the next read starts clean. Errors
    /// never reach the caller; they are logged.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get(key) {
            Ok(value) => value,
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(key, error = %e, "discarding malformed stored value");
                if let Err(e) = self.store.delete(key) {
                    tracing::warn!(key, error = %e, "failed to delete malformed stored value");
                }
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    /// Set a value.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let text = serde_json::to_string(value)?;
        self.store.set(key, &text)
    }

    /// Write a value without surfacing failures to the caller.
    pub fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.set(key, value) {
            tracing::warn!(key, error = %e, "best-effort persist failed");
        }
    }

    /// Read a raw string value, bypassing JSON decoding.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.store.get(key)
    }

    /// Store a raw string value, bypassing JSON encoding.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.store.set(key, value)
    }

    /// Delete a value.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Delete a value, logging instead of failing.
    pub fn forget(&self, key: &str) {
        if let Err(e) = self.store.delete(key) {
            tracing::warn!(key, error = %e, "best-effort delete failed");
        }
    }

    /// Check if a key exists.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.store.get(key)?.is_some())
    }

    /// Get all keys.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }
}
