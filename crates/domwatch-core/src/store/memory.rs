// # Memory Lookup Cache
//
// In-memory implementation of LookupCache.
//
// ## Purpose
//
// Same contract as the file-backed store without touching the disk. Useful
// for testing whois-client collaborators, or for one-shot runs where a
// cold cache on the next start is acceptable.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::lookup_cache::{CacheEntry, CachedLookup, LookupCache};

/// In-memory lookup cache
///
/// Entries live in a HashMap behind a RwLock. Nothing survives a restart.
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryLookupCache {
    inner: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryLookupCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of entries
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Store a prepared entry as-is, keeping its timestamp
    pub async fn insert_entry(&self, entry: CacheEntry) {
        let mut guard = self.inner.write().await;
        guard.insert(entry.key.clone(), entry);
    }
}

#[async_trait]
impl LookupCache for MemoryLookupCache {
    async fn get(&self, key: &str) -> Result<Option<CachedLookup>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(key).cloned().map(CachedLookup::from_entry))
    }

    async fn put(&self, key: &str, payload: serde_json::Value) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::invalid_input("Cache key cannot be empty"));
        }
        self.insert_entry(CacheEntry::new(key, payload)).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        let mut guard = self.inner.write().await;
        Ok(guard.remove(key))
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        // Nothing to persist
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_cache_basic() {
        let cache = MemoryLookupCache::new();
        assert!(cache.is_empty().await);

        cache.put("example.com", json!({"a": 1})).await.unwrap();
        cache.put("example.com", json!({"a": 2})).await.unwrap();
        assert_eq!(cache.len().await, 1);

        let hit = cache.get("example.com").await.unwrap().unwrap();
        assert_eq!(hit.entry.payload, json!({"a": 2}));

        cache.remove("example.com").await.unwrap();
        assert!(cache.get("example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_keys_default_method() {
        let cache = MemoryLookupCache::new();

        let mut old = CacheEntry::new("old.example", json!(null));
        old.retrieved_at = Utc::now() - chrono::Duration::days(2);
        cache.insert_entry(old).await;
        cache.put("fresh.example", json!(null)).await.unwrap();

        let stale = cache.stale_keys(chrono::Duration::days(1)).await.unwrap();
        assert_eq!(stale, vec!["old.example".to_string()]);
    }
}
