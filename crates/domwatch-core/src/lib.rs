// # domwatch-core
//
// Persistence layer for domwatch: operator-editable YAML files mirrored in
// memory.
//
// ## Architecture Overview
//
// - **SettingsStore**: Single-record application settings (`config.yaml`)
// - **DomainStore**: Ordered list of monitored domains keyed by FQDN (`domain.yaml`)
// - **LookupCacheStore**: Cached whois results with caller-evaluated staleness
// - **LookupCache**: Trait seam the whois client talks to
//
// ## Design Principles
//
// 1. **Whole-file writes**: Every mutation rewrites its backing file in full
// 2. **Independent stores**: No store knows about another; the caller opens
//    each one against a base directory
// 3. **Typed failures**: Corrupt or unwritable files surface as `Error`,
//    never retried or swallowed
// 4. **First run is not an error**: A missing file becomes a default document

pub mod config;
pub mod error;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use store::{
    Domain, DomainStore, LoadOutcome, LookupCacheStore, MailTransport, MemoryLookupCache,
    Settings, SettingsStore, UpsertOutcome,
};
pub use traits::{CacheEntry, CachedLookup, LookupCache};
