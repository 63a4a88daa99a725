//! Core traits for the domwatch stores
//!
//! - [`LookupCache`]: Cached lookup results consulted before a whois query

pub mod lookup_cache;

pub use lookup_cache::{CacheEntry, CachedLookup, LookupCache};
