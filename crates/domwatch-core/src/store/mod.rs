// # Store Implementations
//
// Each store pairs an in-memory value with the file it was loaded from and
// rewrites that whole file after every mutation.

pub mod cache;
pub mod document;
pub mod domains;
pub mod memory;
pub mod settings;

pub use cache::{CacheFile, LookupCacheStore};
pub use document::{Document, LoadOutcome};
pub use domains::{Domain, DomainFile, DomainStore, UpsertOutcome};
pub use memory::MemoryLookupCache;
pub use settings::{MailTransport, Settings, SettingsStore};
