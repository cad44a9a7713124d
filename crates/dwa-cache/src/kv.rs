//! Key-Value store wrapper with automatic serialization.

use std::path::Path;
use std::sync::Arc;

use crate::store::{FileStore, MemoryStore, Store};
use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe cache over a shared [`Store`] backend.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning a `Cache` yields another
/// handle on the same backend.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap an existing backend.
    pub fn with_store(store: impl Store + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Open a fresh in-memory cache.
    ///
    /// # Example
    ///
    /// ```
    /// use dwa_cache::Cache;
    /// let cache = Cache::in_memory();
    /// cache.set("cartItems", &vec![1, 2, 3]).unwrap();
    /// let items: Option<Vec<i32>> = cache.get("cartItems").unwrap();
    /// assert_eq!(items, Some(vec![1, 2, 3]));
    /// ```
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Open a file-backed cache rooted at `dir`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir("/var/lib/dwa")?;
    /// ```
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        Ok(Self::with_store(FileStore::open(dir)?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and a
    /// [`CacheError::SerializeError`] if the stored bytes are not a valid `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let order: Option<OrderData> = cache.get("currentOrder")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Get the raw stored text, without decoding it.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self
            .store
            .get(key)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("cartItems", &lines)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Store raw text verbatim.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.store.set(key, value.as_bytes())
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }
}
