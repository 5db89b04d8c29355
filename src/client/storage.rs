use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Mutex, PoisonError};

use redis::Commands;

/// Keys the like-state client persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// JSON array of liked movie/series IDs, as strings
    LikedSeries,
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::LikedSeries => write!(f, "likedSeries"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] redis::RedisError),

    #[error("Value stored under {key} is not a JSON array of IDs: {source}")]
    Corrupt {
        key: StorageKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistent string store shaped like browser `localStorage`
///
/// Calls are synchronous; the like-state client runs them inline from its
/// click handler.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Replaces whatever was stored under `key`
    fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(&key).cloned())
    }

    fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key, value.to_string());
        Ok(())
    }
}

/// Redis-backed store, one namespace per client session
pub struct RedisStore {
    client: redis::Client,
    namespace: String,
}

impl RedisStore {
    pub fn open(redis_url: &str, namespace: impl Into<String>) -> Result<Self, StorageError> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
            namespace: namespace.into(),
        })
    }

    fn namespaced(&self, key: StorageKey) -> String {
        format!("paw:{}:{}", self.namespace, key)
    }
}

impl KeyValueStore for RedisStore {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_connection()?;
        let value: Option<String> = conn.get(self.namespaced(key))?;
        Ok(value)
    }

    fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_connection()?;
        let _: () = conn.set(self.namespaced(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_display() {
        assert_eq!(StorageKey::LikedSeries.to_string(), "likedSeries");
    }

    #[test]
    fn test_memory_store_replaces_value() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item(StorageKey::LikedSeries).unwrap(), None);

        tokio_test::assert_ok!(store.set_item(StorageKey::LikedSeries, "[\"1\"]"));
        tokio_test::assert_ok!(store.set_item(StorageKey::LikedSeries, "[\"2\"]"));

        assert_eq!(
            store.get_item(StorageKey::LikedSeries).unwrap().as_deref(),
            Some("[\"2\"]")
        );
    }

    #[test]
    fn test_redis_keys_are_namespaced() {
        let store = RedisStore::open("redis://localhost:6379", "tab-7").unwrap();
        assert_eq!(store.namespaced(StorageKey::LikedSeries), "paw:tab-7:likedSeries");
    }

    #[test]
    #[ignore = "requires Redis"]
    fn test_redis_round_trip() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let store = RedisStore::open(&redis_url, "test_redis_round_trip").unwrap();

        store.set_item(StorageKey::LikedSeries, "[\"42\"]").unwrap();
        assert_eq!(
            store.get_item(StorageKey::LikedSeries).unwrap().as_deref(),
            Some("[\"42\"]")
        );

        let mut conn = store.client.get_connection().unwrap();
        let _: () = conn.del(store.namespaced(StorageKey::LikedSeries)).unwrap();
    }
}
