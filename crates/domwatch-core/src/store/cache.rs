// # Lookup Cache Store
//
// File-backed implementation of LookupCache, kept in `whois-cache.yaml`.
//
// ## File Format
//
// ```yaml
// entries:
//   - key: example.com
//     payload:
//       registrar: Example Registrar
//       expires: 2027-01-01
//     retrieved_at: 2026-10-19T12:00:00Z
// ```
//
// Entries stay in insertion order; a `put` for a known key rewrites that
// entry in place. Expired entries are kept until a caller refreshes or
// removes them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::document::{self, Document, LoadOutcome};
use crate::config::StoreConfig;
use crate::traits::lookup_cache::{CacheEntry, CachedLookup, LookupCache};
use crate::{Error, Result};

/// On-disk shape of the lookup cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheFile {
    #[serde(default)]
    pub entries: Vec<CacheEntry>,
}

impl Document for CacheFile {
    const KIND: &'static str = "whois cache";

    // An empty cache is the normal state before the first lookup
    fn is_blank(&self) -> bool {
        false
    }
}

/// File-backed lookup cache
///
/// # Example
///
/// ```rust,no_run
/// use domwatch_core::{LookupCacheStore, StoreConfig};
/// use domwatch_core::traits::LookupCache;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = LookupCacheStore::load(&StoreConfig::new("/var/lib/domwatch")).await?;
///
///     cache.put("example.com", serde_json::json!({"registrar": "x"})).await?;
///
///     let hit = cache.get("example.com").await?.expect("just cached");
///     assert!(!hit.is_stale(chrono::Duration::hours(24)));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct LookupCacheStore {
    path: PathBuf,
    cache: RwLock<CacheFile>,
    outcome: LoadOutcome,
}

impl LookupCacheStore {
    /// Open the cache file named by `config`
    pub async fn load(config: &StoreConfig) -> Result<Self> {
        Self::open(config.cache_path()).await
    }

    /// Open the cache file at an explicit path
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (mut cache, outcome) = document::load_or_init::<CacheFile>(&path).await?;

        // Hand-edited files may repeat a key; the last occurrence wins
        let before = cache.entries.len();
        dedup_last_wins(&mut cache.entries);
        if cache.entries.len() != before {
            tracing::warn!(
                "Dropped {} duplicate cache key(s) from {}",
                before - cache.entries.len(),
                path.display()
            );
            document::write(&path, &cache).await?;
        }

        tracing::debug!("Whois cache holds {} entries", cache.entries.len());

        Ok(Self {
            path,
            cache: RwLock::new(cache),
            outcome,
        })
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file was synthesized by this open
    pub fn load_outcome(&self) -> LoadOutcome {
        self.outcome
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        self.cache.read().await.entries.len()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.entries.is_empty()
    }
}

#[async_trait]
impl LookupCache for LookupCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CachedLookup>> {
        let cache = self.cache.read().await;
        Ok(cache
            .entries
            .iter()
            .find(|e| e.key == key)
            .cloned()
            .map(CachedLookup::from_entry))
    }

    async fn put(&self, key: &str, payload: serde_json::Value) -> Result<()> {
        if key.is_empty() {
            return Err(Error::invalid_input("Cache key cannot be empty"));
        }

        let mut cache = self.cache.write().await;
        let mut next = cache.clone();
        let entry = CacheEntry::new(key, payload);

        let index = next.entries.iter().position(|e| e.key == key);
        let refreshed = index.is_some();
        match index {
            Some(index) => next.entries[index] = entry,
            None => next.entries.push(entry),
        }

        document::write(&self.path, &next).await?;
        *cache = next;

        if refreshed {
            tracing::debug!("Refreshed cache entry {}", key);
        } else {
            tracing::debug!("Cached lookup for {}", key);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<Option<CacheEntry>> {
        let mut cache = self.cache.write().await;

        let index = cache.entries.iter().position(|e| e.key == key);
        let Some(index) = index else {
            return Ok(None);
        };

        let mut next = cache.clone();
        let removed = next.entries.remove(index);
        document::write(&self.path, &next).await?;
        *cache = next;

        tracing::debug!("Removed cache entry {}", key);
        Ok(Some(removed))
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let cache = self.cache.read().await;
        Ok(cache.entries.iter().map(|e| e.key.clone()).collect())
    }

    async fn stale_keys(&self, max_age: chrono::Duration) -> Result<Vec<String>> {
        let cache = self.cache.read().await;
        Ok(cache
            .entries
            .iter()
            .filter(|e| e.is_stale(max_age))
            .map(|e| e.key.clone())
            .collect())
    }

    async fn flush(&self) -> Result<()> {
        let cache = self.cache.read().await;
        document::write(&self.path, &*cache).await
    }
}

/// Keep only the last entry for each key, at the position of that last entry
fn dedup_last_wins(entries: &mut Vec<CacheEntry>) {
    let mut seen = std::collections::HashSet::new();
    let mut kept: Vec<CacheEntry> = entries
        .drain(..)
        .rev()
        .filter(|e| seen.insert(e.key.clone()))
        .collect();
    kept.reverse();
    *entries = kept;
}
