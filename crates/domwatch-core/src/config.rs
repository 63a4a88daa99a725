//! Store configuration
//!
//! Where the stores live on disk and how long cached lookups stay fresh.
//! Nothing here is process-global: every store is opened against an explicit
//! [`StoreConfig`], so tests can point each one at its own temporary directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default file name of the settings document
pub const SETTINGS_FILE: &str = "config.yaml";

/// Default file name of the monitored-domain document
pub const DOMAINS_FILE: &str = "domain.yaml";

/// Default file name of the whois lookup cache
pub const CACHE_FILE: &str = "whois-cache.yaml";

/// Locations and policy shared by the three stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding every backing file
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Settings file name, relative to `base_dir`
    #[serde(default = "default_settings_file")]
    pub settings_file: String,

    /// Domain list file name, relative to `base_dir`
    #[serde(default = "default_domains_file")]
    pub domains_file: String,

    /// Lookup cache file name, relative to `base_dir`
    #[serde(default = "default_cache_file")]
    pub cache_file: String,

    /// Age (in seconds) after which a cached lookup should be refreshed
    ///
    /// The cache store never evicts on its own; callers compare entry ages
    /// against this window.
    #[serde(default = "default_cache_retention_secs")]
    pub cache_retention_secs: u64,
}

impl StoreConfig {
    /// Create a configuration rooted at `base_dir` with default file names
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Override the cache retention window
    pub fn with_cache_retention_secs(mut self, secs: u64) -> Self {
        self.cache_retention_secs = secs;
        self
    }

    /// Absolute-or-relative path of the settings document
    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join(&self.settings_file)
    }

    /// Path of the domain list document
    pub fn domains_path(&self) -> PathBuf {
        self.base_dir.join(&self.domains_file)
    }

    /// Path of the lookup cache document
    pub fn cache_path(&self) -> PathBuf {
        self.base_dir.join(&self.cache_file)
    }

    /// Retention window as a `chrono::Duration`
    pub fn cache_retention(&self) -> chrono::Duration {
        i64::try_from(self.cache_retention_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        for (label, name) in [
            ("settings", &self.settings_file),
            ("domains", &self.domains_file),
            ("cache", &self.cache_file),
        ] {
            validate_file_name(label, name)?;
        }

        if self.settings_file == self.domains_file
            || self.settings_file == self.cache_file
            || self.domains_file == self.cache_file
        {
            return Err(crate::Error::config(
                "Settings, domains and cache must use distinct file names",
            ));
        }

        if self.cache_retention_secs == 0 {
            return Err(crate::Error::config("Cache retention must be > 0"));
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            settings_file: default_settings_file(),
            domains_file: default_domains_file(),
            cache_file: default_cache_file(),
            cache_retention_secs: default_cache_retention_secs(),
        }
    }
}

fn validate_file_name(label: &str, name: &str) -> Result<(), crate::Error> {
    if name.is_empty() {
        return Err(crate::Error::config(format!(
            "{label} file name cannot be empty"
        )));
    }

    if name.chars().any(std::path::is_separator) || name == "." || name == ".." {
        return Err(crate::Error::config(format!(
            "{label} file name must not contain path separators: '{name}'"
        )));
    }

    Ok(())
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_settings_file() -> String {
    SETTINGS_FILE.to_string()
}

fn default_domains_file() -> String {
    DOMAINS_FILE.to_string()
}

fn default_cache_file() -> String {
    CACHE_FILE.to_string()
}

fn default_cache_retention_secs() -> u64 {
    24 * 60 * 60
}
