// # Lookup Cache Trait
//
// Defines the interface the whois client uses to avoid repeating lookups.
//
// ## Purpose
//
// The cache remembers, per lookup key:
// - The payload the last lookup produced (opaque to the cache)
// - When that payload was retrieved
//
// ## Staleness
//
// Entries never expire on their own. `get` reports an entry's age and the
// caller decides whether it is still good enough, because tolerance differs
// between uses. A caller that finds an entry too old performs the lookup
// again and `put`s the fresh result.
//
// ## Usage
//
// ```rust,ignore
// if let Some(hit) = cache.get("example.com").await?
//     && !hit.is_stale(retention)
// {
//     return Ok(hit.entry.payload);
// }
// let payload = whois.lookup("example.com").await?;
// cache.put("example.com", payload.clone()).await?;
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cached lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The looked-up identifier (a domain, a registrar target, ...)
    pub key: String,
    /// Result of the lookup
    #[serde(default)]
    pub payload: serde_json::Value,
    /// When the payload was retrieved
    pub retrieved_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry retrieved now
    pub fn new(key: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            payload,
            retrieved_at: Utc::now(),
        }
    }

    /// Time since retrieval, never negative
    pub fn age(&self) -> chrono::Duration {
        Utc::now()
            .signed_duration_since(self.retrieved_at)
            .max(chrono::Duration::zero())
    }

    /// Check if the entry is older than `max_age`
    pub fn is_stale(&self, max_age: chrono::Duration) -> bool {
        self.age() > max_age
    }
}

/// A cache hit together with its age at the time of the lookup
#[derive(Debug, Clone, PartialEq)]
pub struct CachedLookup {
    pub entry: CacheEntry,
    pub age: chrono::Duration,
}

impl CachedLookup {
    pub(crate) fn from_entry(entry: CacheEntry) -> Self {
        let age = entry.age();
        Self { entry, age }
    }

    /// Check if the hit was older than `max_age` when it was read
    pub fn is_stale(&self, max_age: chrono::Duration) -> bool {
        self.age > max_age
    }
}

/// Trait for lookup cache implementations
///
/// Implementations must be safe to share between tasks. Each mutating call
/// completes (in memory and, where applicable, on disk) before it returns.
#[async_trait]
pub trait LookupCache: Send + Sync {
    /// Get the cached entry for `key`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(CachedLookup))`: The entry and its age
    /// - `Ok(None)`: Nothing cached for this key
    /// - `Err(Error)`: Storage error
    async fn get(&self, key: &str) -> Result<Option<CachedLookup>, crate::Error>;

    /// Insert or replace the entry for `key`, stamped with the current time
    async fn put(&self, key: &str, payload: serde_json::Value) -> Result<(), crate::Error>;

    /// Drop the entry for `key`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(CacheEntry))`: The removed entry
    /// - `Ok(None)`: Nothing was cached for this key
    /// - `Err(Error)`: Storage error
    async fn remove(&self, key: &str) -> Result<Option<CacheEntry>, crate::Error>;

    /// List all cached keys
    async fn keys(&self) -> Result<Vec<String>, crate::Error>;

    /// Keys whose entries are older than `max_age`
    async fn stale_keys(&self, max_age: chrono::Duration) -> Result<Vec<String>, crate::Error> {
        let mut stale = Vec::new();
        for key in self.keys().await? {
            if let Some(hit) = self.get(&key).await?
                && hit.is_stale(max_age)
            {
                stale.push(key);
            }
        }
        Ok(stale)
    }

    /// Persist the current contents
    async fn flush(&self) -> Result<(), crate::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staleness() {
        let mut entry = CacheEntry::new("example.com", serde_json::json!({"registrar": "x"}));
        assert!(!entry.is_stale(chrono::Duration::hours(1)));

        entry.retrieved_at = Utc::now() - chrono::Duration::hours(2);
        assert!(entry.is_stale(chrono::Duration::hours(1)));
        assert!(!entry.is_stale(chrono::Duration::hours(3)));
    }

    #[test]
    fn test_future_timestamp_has_zero_age() {
        let mut entry = CacheEntry::new("example.com", serde_json::Value::Null);
        entry.retrieved_at = Utc::now() + chrono::Duration::minutes(5);
        assert_eq!(entry.age(), chrono::Duration::zero());
    }
}
