//! Cache manager for timestamped JSON entries
//!
//! Provides a `CacheManager` that wraps values in a `{data, timestamp}`
//! envelope before handing them to a [`Store`], and checks freshness against
//! a TTL on the way back out.

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::store::Store;

/// Errors that can occur reading or writing cache entries
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying store failed
    #[error("Cache store error: {0}")]
    Store(#[from] std::io::Error),

    /// A stored entry could not be decoded
    #[error("Corrupt cache entry '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage
    #[error("Failed to encode cache entry: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Envelope persisted for every cached entity
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached, in epoch milliseconds
    timestamp: i64,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was cached, in epoch milliseconds
    pub timestamp: i64,
    /// Whether the entry is older than the TTL it was read with
    pub is_expired: bool,
}

/// Reads and writes timestamped entries on top of a [`Store`]
///
/// Expired entries are still returned (with `is_expired = true`) so callers
/// can degrade to last-known data when the API is unavailable.
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager").finish_non_exhaustive()
    }
}

impl CacheManager {
    /// Creates a CacheManager over the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Writes data stamped with the current time
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> Result<(), CacheError> {
        self.write_at(key, data, Utc::now().timestamp_millis())
    }

    /// Writes data stamped with an explicit epoch-millisecond timestamp
    pub fn write_at<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        timestamp: i64,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry { data, timestamp };
        let json = serde_json::to_string(&entry).map_err(CacheError::Encode)?;
        self.store.set(key, &json)?;
        Ok(())
    }

    /// Reads an entry and checks it against `ttl`
    ///
    /// An entry is fresh while `now - timestamp < ttl`. With `ttl = None` every
    /// entry is fresh.
    ///
    /// # Returns
    /// * `Ok(None)` if nothing is stored under `key`
    /// * `Ok(Some(CachedData))` if the entry decodes
    /// * `Err(CacheError::Corrupt)` if the stored JSON does not decode
    pub fn read<T: DeserializeOwned>(
        &self,
        key: &str,
        ttl: Option<Duration>,
    ) -> Result<Option<CachedData<T>>, CacheError> {
        let Some(content) = self.store.get(key)? else {
            return Ok(None);
        };

        let entry: CacheEntry<T> =
            serde_json::from_str(&content).map_err(|source| CacheError::Corrupt {
                key: key.to_string(),
                source,
            })?;

        let age_ms = Utc::now().timestamp_millis() - entry.timestamp;
        let is_expired = ttl.is_some_and(|ttl| i128::from(age_ms) >= ttl.as_millis() as i128);

        Ok(Some(CachedData {
            data: entry.data,
            timestamp: entry.timestamp,
            is_expired,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::{FileStore, MemoryStore};
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(3600);

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn test_data() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    fn memory_cache() -> (CacheManager, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (CacheManager::new(store.clone()), store)
    }

    #[test]
    fn test_write_stores_data_timestamp_envelope() {
        let (cache, store) = memory_cache();

        cache.write("k", &test_data()).expect("Write should succeed");

        let raw = store.get("k").unwrap().expect("entry should exist");
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["data"]["name"], "test");
        assert!(value["timestamp"].is_i64());
    }

    #[test]
    fn test_read_returns_none_for_missing_key() {
        let (cache, _store) = memory_cache();

        let result: Option<CachedData<TestData>> =
            cache.read("nonexistent_key", Some(HOUR)).unwrap();

        assert!(result.is_none(), "Should return None for missing key");
    }

    #[test]
    fn test_fresh_entry_is_not_expired() {
        let (cache, _store) = memory_cache();
        cache.write("fresh", &test_data()).unwrap();

        let result: CachedData<TestData> = cache.read("fresh", Some(HOUR)).unwrap().unwrap();

        assert_eq!(result.data, test_data());
        assert!(!result.is_expired, "Fresh cache should not be expired");
    }

    #[test]
    fn test_old_entry_is_expired_but_returned() {
        let (cache, _store) = memory_cache();
        let two_hours_ago = Utc::now().timestamp_millis() - 2 * 3_600_000;
        cache.write_at("old", &test_data(), two_hours_ago).unwrap();

        let result: CachedData<TestData> = cache.read("old", Some(HOUR)).unwrap().unwrap();

        assert_eq!(result.data, test_data());
        assert!(result.is_expired, "Entry older than TTL should be expired");
        assert_eq!(result.timestamp, two_hours_ago);
    }

    #[test]
    fn test_no_ttl_never_expires() {
        let (cache, _store) = memory_cache();
        cache.write_at("ancient", &test_data(), 0).unwrap();

        let result: CachedData<TestData> = cache.read("ancient", None).unwrap().unwrap();

        assert!(!result.is_expired);
    }

    #[test]
    fn test_corrupt_entry_is_reported() {
        let (cache, store) = memory_cache();
        store.set("broken", "{not json").unwrap();

        let result = cache.read::<TestData>("broken", Some(HOUR));

        assert!(matches!(result, Err(CacheError::Corrupt { .. })));
    }

    #[test]
    fn test_overwrite_existing_cache() {
        let (cache, _store) = memory_cache();
        let second = TestData {
            name: "second".to_string(),
            value: 2,
        };

        cache.write("overwrite_key", &test_data()).unwrap();
        cache.write("overwrite_key", &second).unwrap();

        let result: CachedData<TestData> = cache.read("overwrite_key", None).unwrap().unwrap();
        assert_eq!(result.data, second, "Cache should contain latest data");
    }

    #[test]
    fn test_file_backed_cache_survives_new_manager() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let first = CacheManager::new(Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf())));
        first.write("persisted", &test_data()).unwrap();

        let second =
            CacheManager::new(Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf())));
        let result: CachedData<TestData> = second.read("persisted", Some(HOUR)).unwrap().unwrap();

        assert_eq!(result.data, test_data());
    }
}
